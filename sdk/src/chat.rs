use crate::errors::{AnalysisError, AnalysisResult};
use crate::mock::MockChatModel;
use crate::settings::ApiConfiguration;
use crate::types::{Message, Part};
use reqwest::{
    header::{self, HeaderValue},
    Client,
};
use tracing::debug;

const DEFAULT_TEMPERATURE: f64 = 0.2;
const DEFAULT_TOP_P: f64 = 0.9;

/// A single chat-completion exchange.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the first completion's text content, unparsed.
    async fn complete(&self, request: ChatRequest) -> AnalysisResult<String>;
}

pub struct HttpChatModel {
    pub endpoint: String,
    pub model_id: String,
    pub client: Client,
}

pub struct HttpChatModelOptions {
    pub endpoint: String,
    pub model_id: String,
    pub api_key: String,
}

impl HttpChatModel {
    pub fn new(options: HttpChatModelOptions) -> AnalysisResult<Self> {
        let mut headers = header::HeaderMap::new();
        let mut auth_header_value: HeaderValue = format!("Bearer {}", options.api_key)
            .try_into()
            .map_err(|_| {
                AnalysisError::InvalidInput("API key is not a valid header value".to_string())
            })?;
        auth_header_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_header_value);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        Ok(Self {
            endpoint: options.endpoint,
            model_id: options.model_id,
            client: Client::builder().default_headers(headers).build()?,
        })
    }
}

#[async_trait::async_trait]
impl ChatModel for HttpChatModel {
    async fn complete(&self, request: ChatRequest) -> AnalysisResult<String> {
        let params = chat_api::ChatCompletionRequest {
            model: self.model_id.clone(),
            messages: request.messages.iter().map(convert_to_api_message).collect(),
            max_tokens: request.max_tokens,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        };

        debug!(endpoint = %self.endpoint, model = %self.model_id, "sending chat completion request");
        let response = self.client.post(&self.endpoint).json(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::StatusCode(
                status,
                response.text().await.unwrap_or_default(),
            ));
        }

        let completion = response.json::<chat_api::ChatCompletion>().await?;
        let choice = completion.choices.into_iter().next().ok_or(
            AnalysisError::Invariant("chat", "no choices in response".to_string()),
        )?;
        choice.message.content.ok_or(AnalysisError::Invariant(
            "chat",
            "choice has no text content".to_string(),
        ))
    }
}

/// Build the gateway matching the configuration: mock mode gets the canned
/// responder, a configured key gets the HTTP client, and an empty key with
/// mock mode off is an explicit configuration error. Canned data is never an
/// implicit failure fallback.
pub fn chat_model_from_config(config: &ApiConfiguration) -> AnalysisResult<Box<dyn ChatModel>> {
    if config.mock_mode {
        return Ok(Box::new(MockChatModel::new()));
    }
    if config.api_key.is_empty() {
        return Err(AnalysisError::NotConfigured);
    }
    Ok(Box::new(HttpChatModel::new(HttpChatModelOptions {
        endpoint: config.chat_endpoint.clone(),
        model_id: config.chat_model.clone(),
        api_key: config.api_key.clone(),
    })?))
}

fn convert_to_api_message(message: &Message) -> chat_api::ChatMessageParam {
    match message {
        Message::System(message) => chat_api::ChatMessageParam::System(chat_api::ChatMessageBody {
            content: convert_to_api_parts(&message.content),
        }),
        Message::User(message) => chat_api::ChatMessageParam::User(chat_api::ChatMessageBody {
            content: convert_to_api_parts(&message.content),
        }),
    }
}

fn convert_to_api_parts(parts: &[Part]) -> Vec<chat_api::ContentPart> {
    parts
        .iter()
        .map(|part| match part {
            Part::Text(part) => chat_api::ContentPart::Text(chat_api::ContentPartText {
                text: part.text.clone(),
            }),
            Part::Image(part) => chat_api::ContentPart::ImageUrl(chat_api::ContentPartImage {
                image_url: chat_api::ContentPartImageUrl {
                    url: format!("data:{};base64,{}", part.mime_type, part.image_data),
                },
            }),
        })
        .collect()
}

mod chat_api {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize)]
    pub struct ChatCompletionRequest {
        pub model: String,
        pub messages: Vec<ChatMessageParam>,
        pub max_tokens: u32,
        pub temperature: f64,
        pub top_p: f64,
    }

    #[derive(Debug, Serialize)]
    #[serde(tag = "role", rename_all = "lowercase")]
    pub enum ChatMessageParam {
        System(ChatMessageBody),
        User(ChatMessageBody),
    }

    #[derive(Debug, Serialize)]
    pub struct ChatMessageBody {
        pub content: Vec<ContentPart>,
    }

    #[derive(Debug, Serialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    pub enum ContentPart {
        Text(ContentPartText),
        ImageUrl(ContentPartImage),
    }

    #[derive(Debug, Serialize)]
    pub struct ContentPartText {
        pub text: String,
    }

    #[derive(Debug, Serialize)]
    pub struct ContentPartImage {
        pub image_url: ContentPartImageUrl,
    }

    #[derive(Debug, Serialize)]
    pub struct ContentPartImageUrl {
        pub url: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ChatCompletion {
        pub choices: Vec<ChatCompletionChoice>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ChatCompletionChoice {
        pub message: ChatCompletionMessage,
    }

    #[derive(Debug, Deserialize)]
    pub struct ChatCompletionMessage {
        pub content: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_rejects_empty_key_when_mock_is_off() {
        let config = ApiConfiguration::default();
        assert!(matches!(
            chat_model_from_config(&config).map(|_| ()),
            Err(AnalysisError::NotConfigured)
        ));
    }

    #[test]
    fn request_body_matches_the_wire_contract() {
        let params = chat_api::ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![convert_to_api_message(&Message::user("hello"))],
            max_tokens: 256,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        };
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"][0]["type"], "text");
        assert_eq!(body["messages"][0]["content"][0]["text"], "hello");
    }

    #[test]
    fn image_parts_become_data_urls() {
        let message = Message::user_parts(vec![Part::Image(crate::ImagePart::new(
            "QUJD",
            "image/png",
        ))]);
        let body = serde_json::to_value(convert_to_api_message(&message)).unwrap();
        assert_eq!(body["content"][0]["type"], "image_url");
        assert_eq!(
            body["content"][0]["image_url"]["url"],
            "data:image/png;base64,QUJD"
        );
    }
}
