//! OpenAI-compatible Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Works against any endpoint speaking the Chat Completions protocol (OpenAI,
//! SiliconFlow, vLLM, ...): set the base URL and key on the `OpenAIConfig`. When tools
//! are set they are advertised as `function` tools and the model may answer with
//! `tool_calls`.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse, LlmUsage, ToolChoiceMode};
use crate::message::Message;
use crate::state::ToolCall;
use crate::tool_source::ToolSpec;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCalls, ChatCompletionRequestMessage, ChatCompletionTool,
        ChatCompletionToolChoiceOption, ChatCompletionTools, CreateChatCompletionRequestArgs,
        FunctionObject, ToolChoiceOptions,
    },
    Client,
};

/// OpenAI Chat Completions client.
///
/// Build with [`ChatOpenAI::with_config`] and attach the tools the model may call with
/// [`ChatOpenAI::with_tools`]. Tool choice defaults to `auto` so the model can stop
/// calling tools and answer.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    tools: Option<Vec<ToolSpec>>,
    temperature: Option<f32>,
    tool_choice: ToolChoiceMode,
}

impl ChatOpenAI {
    /// Client with default config (API key from `OPENAI_API_KEY`).
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::default(), model)
    }

    /// Client with an explicit API key / base URL.
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            tools: None,
            temperature: None,
            tool_choice: ToolChoiceMode::default(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_tool_choice(mut self, mode: ToolChoiceMode) -> Self {
        self.tool_choice = mode;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Converts our messages to the Chat Completions wire shape.
    ///
    /// AI tool calls are sent back with their ids and stringified arguments so the
    /// provider can pair them with the following tool messages.
    fn message_to_wire(message: &Message) -> Value {
        match message {
            Message::System { content } => json!({ "role": "system", "content": content }),
            Message::Human { content } => json!({ "role": "user", "content": content }),
            Message::Ai {
                content,
                tool_calls,
            } => {
                let mut wire = json!({ "role": "assistant", "content": content });
                if !tool_calls.is_empty() {
                    wire["tool_calls"] = tool_calls
                        .iter()
                        .map(|tc| {
                            json!({
                                "id": tc.id,
                                "type": "function",
                                "function": {
                                    "name": tc.name,
                                    "arguments": tc.arguments.to_string(),
                                }
                            })
                        })
                        .collect();
                }
                wire
            }
            Message::Tool {
                content,
                tool_call_id,
                ..
            } => json!({ "role": "tool", "content": content, "tool_call_id": tool_call_id }),
        }
    }

    fn messages_to_request(
        messages: &[Message],
    ) -> Result<Vec<ChatCompletionRequestMessage>, AgentError> {
        messages
            .iter()
            .map(|m| {
                serde_json::from_value(Self::message_to_wire(m)).map_err(|e| {
                    AgentError::Model(format!("cannot encode {} message: {}", m.role(), e))
                })
            })
            .collect()
    }

    /// Tool call arguments arrive as a JSON string; empty means no arguments. Unparseable
    /// text is kept as a string so the tool reports it as invalid input.
    fn parse_arguments(raw: &str) -> Value {
        if raw.trim().is_empty() {
            return json!({});
        }
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(Self::messages_to_request(messages)?);

        if let Some(ref tools) = self.tools {
            let chat_tools: Vec<ChatCompletionTools> = tools
                .iter()
                .map(|t| {
                    ChatCompletionTools::Function(ChatCompletionTool {
                        function: FunctionObject {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: Some(t.input_schema.clone()),
                            ..Default::default()
                        },
                    })
                })
                .collect();
            if !chat_tools.is_empty() {
                args.tools(chat_tools);
                let opt = match self.tool_choice {
                    ToolChoiceMode::Auto => ToolChoiceOptions::Auto,
                    ToolChoiceMode::None => ToolChoiceOptions::None,
                    ToolChoiceMode::Required => ToolChoiceOptions::Required,
                };
                args.tool_choice(ChatCompletionToolChoiceOption::Mode(opt));
            }
        }

        if let Some(t) = self.temperature {
            args.temperature(t);
        }

        let request = args
            .build()
            .map_err(|e| AgentError::Model(format!("request build failed: {}", e)))?;

        debug!(
            model = %self.model,
            message_count = messages.len(),
            tools_count = self.tools.as_ref().map(|t| t.len()).unwrap_or(0),
            temperature = ?self.temperature,
            tool_choice = ?self.tool_choice,
            "chat completion request"
        );
        if let Ok(js) = serde_json::to_string_pretty(&request) {
            trace!(request = %js, "chat completion request body");
        }

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::Model(format!("API error: {}", e)))?;

        if let Ok(js) = serde_json::to_string_pretty(&response) {
            trace!(response = %js, "chat completion response body");
        }

        let usage = response.usage.as_ref().map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Model("provider returned no choices".to_string()))?;

        let msg = choice.message;
        let content = msg.content.unwrap_or_default();
        let tool_calls: Vec<ToolCall> = msg
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tc| match tc {
                ChatCompletionMessageToolCalls::Function(f) => Some(ToolCall::new(
                    f.id,
                    f.function.name,
                    Self::parse_arguments(&f.function.arguments),
                )),
                _ => None,
            })
            .collect();

        debug!(
            content_len = content.len(),
            tool_calls = tool_calls.len(),
            ?usage,
            "chat completion response"
        );
        Ok(LlmResponse {
            content,
            tool_calls,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: every message role converts to a request message the client accepts.
    #[test]
    fn messages_to_request_converts_all_roles() {
        let messages = vec![
            Message::system("be brief"),
            Message::human("(1+5)*6=?"),
            Message::ai_with_tool_calls(
                "",
                vec![ToolCall::new("call-1", "add", json!({"a": 1, "b": 5}))],
            ),
            Message::tool_result("call-1", "add", "6"),
            Message::ai("36"),
        ];
        let request = ChatOpenAI::messages_to_request(&messages).unwrap();
        assert_eq!(request.len(), 5);
        assert!(matches!(request[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(request[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(request[2], ChatCompletionRequestMessage::Assistant(_)));
        assert!(matches!(request[3], ChatCompletionRequestMessage::Tool(_)));
    }

    #[test]
    fn assistant_wire_carries_tool_calls_with_string_arguments() {
        let wire = ChatOpenAI::message_to_wire(&Message::ai_with_tool_calls(
            "",
            vec![ToolCall::new("call-1", "add", json!({"a": 1}))],
        ));
        assert_eq!(wire["tool_calls"][0]["id"], "call-1");
        assert_eq!(wire["tool_calls"][0]["function"]["arguments"], "{\"a\":1}");
        let plain = ChatOpenAI::message_to_wire(&Message::ai("hi"));
        assert!(plain.get("tool_calls").is_none());
    }

    #[test]
    fn parse_arguments_handles_empty_and_garbage() {
        assert_eq!(ChatOpenAI::parse_arguments(""), json!({}));
        assert_eq!(ChatOpenAI::parse_arguments("{\"a\":2}"), json!({"a": 2}));
        assert_eq!(
            ChatOpenAI::parse_arguments("not json"),
            Value::String("not json".into())
        );
    }

    #[test]
    fn builder_sets_model_and_tool_choice() {
        let llm = ChatOpenAI::with_config(OpenAIConfig::new().with_api_key("k"), "m")
            .with_tool_choice(ToolChoiceMode::Required)
            .with_temperature(0.0);
        assert_eq!(llm.model(), "m");
        assert_eq!(llm.tool_choice, ToolChoiceMode::Required);
    }

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one HTTP response with `body` after reading the full request.
    async fn serve_once(listener: TcpListener, status: &'static str, body: String) {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut tmp = [0u8; 4096];
        loop {
            let n = stream.read(&mut tmp).await.unwrap();
            buf.extend_from_slice(&tmp[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..pos]).to_ascii_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                while buf.len() < pos + 4 + content_length {
                    let n = stream.read(&mut tmp).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&tmp[..n]);
                }
                break;
            }
            if n == 0 {
                break;
            }
        }
        let resp = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(resp.as_bytes()).await.unwrap();
    }

    fn client_for(addr: std::net::SocketAddr) -> ChatOpenAI {
        let config = OpenAIConfig::new()
            .with_api_key("test-key")
            .with_api_base(format!("http://{}", addr));
        ChatOpenAI::with_config(config, "Qwen/Qwen3-8B")
    }

    fn completion(message: Value, usage: Value) -> String {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "Qwen/Qwen3-8B",
            "choices": [
                {"index": 0, "message": message, "finish_reason": "tool_calls"}
            ],
            "usage": usage
        })
        .to_string()
    }

    /// **Scenario**: provider tool calls become `ToolCall`s with parsed arguments; null
    /// content becomes an empty string; usage is carried over.
    #[tokio::test]
    async fn invoke_maps_tool_calls_and_usage() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = completion(
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "add", "arguments": "{\"a\":1,\"b\":5}"}
                }]
            }),
            json!({"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}),
        );
        let server = tokio::spawn(serve_once(listener, "200 OK", body));

        let out = client_for(addr)
            .invoke(&[Message::human("(1+5)*6=?")])
            .await
            .unwrap();

        assert_eq!(out.content, "");
        assert_eq!(
            out.tool_calls,
            vec![ToolCall::new("call_1", "add", json!({"a": 1, "b": 5}))]
        );
        let usage = out.usage.expect("usage");
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.completion_tokens, 7);
        assert_eq!(usage.total_tokens, 19);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn invoke_plain_answer_has_no_tool_calls() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = completion(
            json!({"role": "assistant", "content": "36"}),
            json!({"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}),
        );
        let server = tokio::spawn(serve_once(listener, "200 OK", body));

        let out = client_for(addr).invoke(&[Message::human("hi")]).await.unwrap();

        assert_eq!(out.content, "36");
        assert!(out.tool_calls.is_empty());
        server.await.unwrap();
    }

    /// **Scenario**: a reply without choices is a model error.
    #[tokio::test]
    async fn invoke_without_choices_is_model_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "Qwen/Qwen3-8B",
            "choices": []
        })
        .to_string();
        let server = tokio::spawn(serve_once(listener, "200 OK", body));

        let err = client_for(addr)
            .invoke(&[Message::human("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::Model(ref m) if m.contains("no choices")), "{}", err);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn invoke_http_failure_is_model_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = json!({
            "error": {"message": "invalid api key", "type": "invalid_request_error", "param": null, "code": "invalid_api_key"}
        })
        .to_string();
        let server = tokio::spawn(serve_once(listener, "401 Unauthorized", body));

        let err = client_for(addr)
            .invoke(&[Message::human("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::Model(_)), "{}", err);
        server.await.unwrap();
    }
}
