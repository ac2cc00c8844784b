//! Sequential request preparation ahead of any concurrent work.
//!
//! Preparation runs fully sequentially and performs no network I/O, so a
//! malformed configuration fails cheaply and attributably before a single
//! generator call is made.

use serde_json::Value;

use crate::error::ConfigError;
use crate::types::{BatchDispatchRequest, PromptUnit};

/// Builds one [`PromptUnit`] per prompt text, all sharing one output shape.
///
/// Prompts are trimmed; order and count are preserved 1:1. The whole batch
/// fails as a [`ConfigError`] when the extract path is supplied without a
/// schema, when a prompt is empty, or when the schema does not compile as
/// JSON Schema.
pub fn prepare<S: AsRef<str>>(
    texts: &[S],
    schema: Option<Value>,
    extract_path: Option<String>,
) -> Result<Vec<PromptUnit>, ConfigError> {
    let extract_path = validate_shape(schema.as_ref(), extract_path)?;

    texts
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let text = text.as_ref().trim();
            if text.is_empty() {
                return Err(ConfigError::EmptyPrompt(index));
            }
            Ok(PromptUnit {
                text: text.to_owned(),
                schema: schema.clone(),
                extract_path: extract_path.clone(),
            })
        })
        .collect()
}

/// Compiles a shorthand field declaration and prepares units with the
/// derived schema and extraction path.
///
/// `declaration` accepts the forms of [`fanout_shorthand::parse`]; a parse
/// failure is a batch-level [`ConfigError`].
pub fn prepare_with_shorthand<S: AsRef<str>>(
    texts: &[S],
    declaration: &str,
) -> Result<Vec<PromptUnit>, ConfigError> {
    let decl = fanout_shorthand::parse(declaration)?;
    prepare(
        texts,
        Some(decl.schema()),
        Some(decl.extract_path().to_owned()),
    )
}

impl BatchDispatchRequest {
    /// Resolves a transport-level request into prompt units, validating each
    /// prompt's shape the way [`prepare`] does.
    ///
    /// Any invalid prompt fails the whole request as a [`ConfigError`];
    /// nothing reaches the generator.
    pub fn into_units(self) -> Result<Vec<PromptUnit>, ConfigError> {
        self.prompts
            .into_iter()
            .enumerate()
            .map(|(index, prompt)| {
                let extract_path = validate_shape(prompt.schema.as_ref(), prompt.extract_path)?;
                let text = prompt.text.trim();
                if text.is_empty() {
                    return Err(ConfigError::EmptyPrompt(index));
                }
                Ok(PromptUnit {
                    text: text.to_owned(),
                    schema: prompt.schema,
                    extract_path,
                })
            })
            .collect()
    }
}

/// Checks the schema/path pairing and compiles the schema early.
fn validate_shape(
    schema: Option<&Value>,
    extract_path: Option<String>,
) -> Result<Option<String>, ConfigError> {
    if let Some(path) = &extract_path {
        if path.trim().is_empty() {
            return Err(ConfigError::EmptyExtractPath);
        }
        if schema.is_none() {
            return Err(ConfigError::ExtractPathWithoutSchema(path.clone()));
        }
    }
    if let Some(schema) = schema {
        compile_schema(schema)?;
    }
    Ok(extract_path)
}

/// Compiles `schema`, surfacing an uncompilable one as a [`ConfigError`].
fn compile_schema(schema: &Value) -> Result<(), ConfigError> {
    jsonschema::Validator::new(schema)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSchema(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn units_map_one_to_one_in_input_order() {
        let units = prepare(&["first", "second", "third"], None, None).unwrap();
        let texts: Vec<_> = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert!(units.iter().all(|u| u.schema.is_none()));
    }

    #[test]
    fn prompt_text_is_trimmed() {
        let units = prepare(&["  padded  "], None, None).unwrap();
        assert_eq!(units[0].text, "padded");
    }

    #[test]
    fn extract_path_without_schema_fails_the_batch() {
        let err = prepare(&["prompt"], None, Some("age".to_string())).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ExtractPathWithoutSchema("age".to_string())
        );
    }

    #[test]
    fn empty_extract_path_fails_the_batch() {
        let schema = json!({ "type": "object" });
        let err = prepare(&["prompt"], Some(schema), Some("  ".to_string())).unwrap_err();
        assert_eq!(err, ConfigError::EmptyExtractPath);
    }

    #[test]
    fn empty_prompt_fails_the_batch_with_its_index() {
        let err = prepare(&["fine", "   ", "also fine"], None, None).unwrap_err();
        assert_eq!(err, ConfigError::EmptyPrompt(1));
    }

    #[test]
    fn uncompilable_schema_fails_the_batch() {
        let schema = json!({ "type": 12 });
        let err = prepare(&["prompt"], Some(schema), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSchema(_)));
    }

    #[test]
    fn shorthand_declaration_supplies_schema_and_path() {
        let units = prepare_with_shorthand(&["How old is the author?"], "age: int").unwrap();
        assert_eq!(units[0].extract_path.as_deref(), Some("age"));
        let schema = units[0].schema.as_ref().unwrap();
        assert_eq!(schema["properties"]["age"]["type"], "integer");
    }

    #[test]
    fn malformed_shorthand_fails_the_batch() {
        let err = prepare_with_shorthand(&["prompt"], "age: number").unwrap_err();
        assert!(matches!(err, ConfigError::Shorthand(_)));
    }

    #[test]
    fn wire_request_resolves_per_prompt_shapes() {
        let request = BatchDispatchRequest {
            prompts: vec![
                crate::types::PromptRequest {
                    text: "Plain".to_string(),
                    schema: None,
                    extract_path: None,
                },
                crate::types::PromptRequest {
                    text: "Shaped".to_string(),
                    schema: Some(json!({
                        "type": "object",
                        "properties": { "label": { "type": "string" } },
                        "required": ["label"],
                    })),
                    extract_path: Some("label".to_string()),
                },
            ],
        };

        let units = request.into_units().unwrap();
        assert_eq!(units.len(), 2);
        assert!(units[0].schema.is_none());
        assert_eq!(units[1].extract_path.as_deref(), Some("label"));
    }

    #[test]
    fn wire_request_with_path_but_no_schema_is_rejected() {
        let request = BatchDispatchRequest {
            prompts: vec![crate::types::PromptRequest {
                text: "Shaped".to_string(),
                schema: None,
                extract_path: Some("label".to_string()),
            }],
        };
        assert!(matches!(
            request.into_units(),
            Err(ConfigError::ExtractPathWithoutSchema(_))
        ));
    }
}
