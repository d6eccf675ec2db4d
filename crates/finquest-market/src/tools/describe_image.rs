//! Tool for describing an image through the vision-capable provider

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use finquest_core::Result as AgentResult;
use finquest_llm::{CompletionRequest, LLMProvider, Message};
use finquest_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::error::{MarketError, Result};

const DEFAULT_PROMPT: &str = "What is in this image?";
const DESCRIPTION_MAX_TOKENS: usize = 500;

/// Tool that sends an image to the vision model and returns its description
///
/// The reasoning provider is shared with the research loop; no separate
/// client is constructed here.
pub struct DescribeImageTool {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct DescribeImageParams {
    #[serde(default)]
    image_path: Option<String>,
    /// Base64-encoded image data
    #[serde(default)]
    image_bytes: Option<String>,
    #[serde(default)]
    prompt: Option<String>,
}

/// Guess the media type from a file extension, defaulting to PNG
fn media_type_for(path: Option<&str>) -> &'static str {
    let ext = path
        .and_then(|p| p.rsplit('.').next())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

impl DescribeImageTool {
    /// Create a new describe-image tool over the shared provider
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    async fn load_image(&self, params: &DescribeImageParams) -> Result<(Vec<u8>, &'static str)> {
        if let Some(encoded) = &params.image_bytes {
            let bytes = BASE64.decode(encoded.trim()).map_err(|_| {
                MarketError::Other("Provided image_bytes is not valid base64".to_string())
            })?;
            return Ok((bytes, "image/png"));
        }

        if let Some(path) = &params.image_path {
            let bytes = tokio::fs::read(path).await?;
            return Ok((bytes, media_type_for(Some(path.as_str()))));
        }

        Err(MarketError::Other(
            "Missing or invalid 'image_path' or 'image_bytes'".to_string(),
        ))
    }

    async fn describe(&self, params: DescribeImageParams) -> Result<Value> {
        let (bytes, media_type) = self.load_image(&params).await?;
        let prompt = params
            .prompt
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

        let message = Message::user_with_image(prompt, media_type, BASE64.encode(&bytes));

        let request = CompletionRequest::builder(&self.model)
            .add_message(message)
            .max_tokens(DESCRIPTION_MAX_TOKENS)
            .build();

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| MarketError::Api(format!("Vision request failed: {e}")))?;

        let description = response.message.text().unwrap_or_default().to_string();

        Ok(json!({"description": description}))
    }
}

#[async_trait]
impl Tool for DescribeImageTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: DescribeImageParams = serde_json::from_value(params)
            .map_err(|e| finquest_core::Error::Tool(format!("Invalid parameters: {e}")))?;

        self.describe(params).await.map_err(Into::into)
    }

    fn name(&self) -> &'static str {
        "describe_image"
    }

    fn description(&self) -> &'static str {
        "Send an image to the vision model and return its description. \
         Provide either 'image_path' or base64 'image_bytes', and optionally \
         a 'prompt'."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "image_path": {
                    "type": "string",
                    "description": "Path to an image file"
                },
                "image_bytes": {
                    "type": "string",
                    "description": "Base64-encoded image data"
                },
                "prompt": {
                    "type": "string",
                    "description": "Question to ask about the image"
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finquest_llm::{CompletionResponse, Result as LLMResult, StopReason, TokenUsage};

    struct CannedVisionProvider;

    #[async_trait]
    impl LLMProvider for CannedVisionProvider {
        async fn complete(&self, request: CompletionRequest) -> LLMResult<CompletionResponse> {
            assert_eq!(request.max_tokens, DESCRIPTION_MAX_TOKENS);
            Ok(CompletionResponse {
                message: Message::assistant("A candlestick chart."),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 0,
                    output_tokens: 0,
                },
            })
        }

        fn name(&self) -> &'static str {
            "canned"
        }
    }

    #[test]
    fn test_media_type_guessing() {
        assert_eq!(media_type_for(Some("shot.PNG")), "image/png");
        assert_eq!(media_type_for(Some("chart.jpeg")), "image/jpeg");
        assert_eq!(media_type_for(Some("anim.gif")), "image/gif");
        assert_eq!(media_type_for(None), "image/png");
    }

    #[tokio::test]
    async fn test_describe_from_base64_bytes() {
        let tool = DescribeImageTool::new(Arc::new(CannedVisionProvider), "gpt-4o");
        let encoded = BASE64.encode(b"fake image bytes");

        let result = tool
            .execute(json!({"image_bytes": encoded, "prompt": "What chart is this?"}))
            .await
            .expect("describes");
        assert_eq!(result["description"], "A candlestick chart.");
    }

    #[tokio::test]
    async fn test_invalid_base64_rejected() {
        let tool = DescribeImageTool::new(Arc::new(CannedVisionProvider), "gpt-4o");

        let err = tool
            .execute(json!({"image_bytes": "!!not-base64!!"}))
            .await
            .expect_err("invalid");
        assert!(err.to_string().contains("not valid base64"));
    }

    #[tokio::test]
    async fn test_missing_inputs_rejected() {
        let tool = DescribeImageTool::new(Arc::new(CannedVisionProvider), "gpt-4o");

        let err = tool.execute(json!({})).await.expect_err("no image");
        assert!(err.to_string().contains("image_path"));
    }
}
