//! Purpose: Walk through loading YAML, addressing into it, editing it, and writing it back out.
//! Role: Runnable demo (`cargo run --example usage`); prints a string and the edited YAML.
//! Invariants: Uses only the public `unstructured::api` surface.

use unstructured::api::{Error, ErrorKind, RawValue, parse_yaml};

const DOCUMENT: &str = r#"
top-level-list:
- "this first element is a string - perhaps containing metadata"
- name: first real element
  type: element-type-1
  payload: [1,2,3,4]
- name: second real element
  type: element-type-2
  payload:
    some: embedded structure
"#;

fn main() -> Result<(), Error> {
    let data = parse_yaml(DOCUMENT)?;

    let payload_value = data.get_by_pointer("/top-level-list/2/payload/some")?;
    if !payload_value.is_string() {
        return Err(Error::new(ErrorKind::WrongShape).with_message("expected a string payload"));
    }
    println!("{}", payload_value.as_string());

    let payload_map = data.get_by_pointer("/top-level-list/2/payload")?;
    payload_map.set_field(
        "additional-key",
        RawValue::from(vec!["some", "arbitrary", "data"]),
    )?;

    let output = serde_yaml::to_string(data.as_raw()).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("the edited document should still serialize")
            .with_source(err)
    })?;
    println!("{output}");
    Ok(())
}
