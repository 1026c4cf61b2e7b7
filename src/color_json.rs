//! Purpose: Render a `RawValue` tree as indented JSON with ANSI colors.
//! Exports: colorize_json.
//! Role: Colored counterpart of `serde_json::to_string_pretty` for terminal output.
//! Invariants: Stripping the escapes yields exactly the `to_string_pretty` text.
use unstructured::api::RawValue;

#[derive(Copy, Clone)]
enum Role {
    Key,
    String,
    Number,
    Bool,
    Null,
    Punct,
}

impl Role {
    // 8/16-color codes only; bright variants wash out on light themes.
    fn code(self) -> &'static str {
        match self {
            Role::Key => "36",
            Role::String => "32",
            Role::Number => "33",
            Role::Bool => "35",
            Role::Null | Role::Punct => "39",
        }
    }
}

pub fn colorize_json(value: &RawValue) -> String {
    let mut painter = Painter::default();
    painter.value(value);
    painter.out
}

#[derive(Default)]
struct Painter {
    out: String,
    depth: usize,
}

impl Painter {
    fn paint(&mut self, role: Role, text: &str) {
        self.out.push_str("\u{1b}[");
        self.out.push_str(role.code());
        self.out.push('m');
        self.out.push_str(text);
        self.out.push_str("\u{1b}[0m");
    }

    fn line_break(&mut self) {
        self.out.push('\n');
        self.out.push_str(&"  ".repeat(self.depth));
    }

    fn value(&mut self, value: &RawValue) {
        match value {
            RawValue::Null => self.paint(Role::Null, "null"),
            RawValue::Bool(flag) => self.paint(Role::Bool, if *flag { "true" } else { "false" }),
            RawValue::Number(_) => self.paint(Role::Number, &encode(value)),
            RawValue::String(_) => self.paint(Role::String, &encode(value)),
            RawValue::List(items) => {
                let items = items.borrow();
                self.container(("[", "]"), items.iter().map(|item| (None, item)));
            }
            RawValue::Object(map) => {
                let map = map.borrow();
                self.container(
                    ("{", "}"),
                    map.iter().map(|(key, item)| (Some(key.as_str()), item)),
                );
            }
        }
    }

    fn container<'a>(
        &mut self,
        (open, close): (&str, &str),
        entries: impl ExactSizeIterator<Item = (Option<&'a str>, &'a RawValue)>,
    ) {
        let len = entries.len();
        if len == 0 {
            self.paint(Role::Punct, &format!("{open}{close}"));
            return;
        }
        self.paint(Role::Punct, open);
        self.depth += 1;
        for (idx, (key, item)) in entries.enumerate() {
            self.line_break();
            if let Some(key) = key {
                let quoted = serde_json::to_string(key).unwrap_or_else(|_| "\"\"".to_string());
                self.paint(Role::Key, &quoted);
                self.paint(Role::Punct, ":");
                self.out.push(' ');
            }
            self.value(item);
            if idx + 1 < len {
                self.paint(Role::Punct, ",");
            }
        }
        self.depth -= 1;
        self.line_break();
        self.paint(Role::Punct, close);
    }
}

fn encode(value: &RawValue) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::colorize_json;
    use serde_json::json;
    use unstructured::api::RawValue;

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            if ch == '\u{1b}' {
                chars.by_ref().find(|c| *c == 'm');
                continue;
            }
            out.push(ch);
        }
        out
    }

    #[test]
    fn layout_matches_serde_pretty() {
        let value = RawValue::from(json!({
            "arr": [1, true, null, 2.5],
            "nested": { "x": "y\n", "empty": {}, "none": [] }
        }));
        let pretty = serde_json::to_string_pretty(&value).expect("pretty");
        assert_eq!(strip_ansi(&colorize_json(&value)), pretty);
    }

    #[test]
    fn each_role_gets_its_color() {
        let value = RawValue::from(json!({"k":"v","n":1,"b":true,"z":null}));
        let colored = colorize_json(&value);
        assert!(colored.contains("\u{1b}[36m\"k\"\u{1b}[0m"));
        assert!(colored.contains("\u{1b}[32m\"v\"\u{1b}[0m"));
        assert!(colored.contains("\u{1b}[33m1\u{1b}[0m"));
        assert!(colored.contains("\u{1b}[35mtrue\u{1b}[0m"));
        assert!(colored.contains("\u{1b}[39mnull\u{1b}[0m"));
    }
}
