use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::dispatcher::executor::OutputItem;

/// Reads input items from a file, or stdin for `-`.
/// Accepts a JSON array of parameter objects or a single object.
pub async fn read_items(input: &str) -> Result<Vec<Value>> {
    let content = if input == "-" {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("failed to read items from stdin")?;
        buffer
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("failed to read items from '{}'", input))?
    };
    parse_items(&content)
}

pub fn parse_items(content: &str) -> Result<Vec<Value>> {
    let parsed: Value = serde_json::from_str(content).context("input items are not valid JSON")?;
    match parsed {
        Value::Array(items) => Ok(items),
        object @ Value::Object(_) => Ok(vec![object]),
        other => Err(anyhow!("input must be a JSON array or object, got {}", other)),
    }
}

/// Writes output items as a pretty JSON array to a file, or stdout when no path is given.
pub async fn write_output(output: Option<&str>, items: &[OutputItem]) -> Result<()> {
    let mut rendered = serde_json::to_vec_pretty(items)?;
    rendered.push(b'\n');
    match output {
        Some(path) => tokio::fs::write(path, rendered)
            .await
            .with_context(|| format!("failed to write output to '{}'", path)),
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&rendered).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_object_is_one_item() {
        let items = parse_items(r#"{"operation": "search"}"#).unwrap();
        assert_eq!(items, vec![json!({"operation": "search"})]);
    }

    #[test]
    fn array_keeps_order() {
        let items = parse_items(r#"[{"operation": "delete"}, {"operation": "search"}]"#).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["operation"], "delete");
    }

    #[test]
    fn scalars_are_rejected() {
        assert!(parse_items("42").is_err());
        assert!(parse_items("not json").is_err());
    }

    #[tokio::test]
    async fn output_file_uses_paired_item_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let items = vec![OutputItem::success(0, json!({"data": []}))];
        write_output(Some(path.to_str().unwrap()), &items).await.unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!([{"json": {"data": []}, "pairedItem": {"item": 0}}]));
    }
}
