use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use log::{debug, warn};
use ropey::Rope;
use serde_json::Value;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::completions::{self, CursorPosition};
use crate::document::LineSource;
use crate::mode::CompletionMode;
use crate::provider::CompletionProvider;

pub struct DocumentState {
    pub rope: Rope,
}

#[derive(Debug, Clone, Default)]
pub struct Configuration {
    pub autocomplete: CompletionMode,
}

impl Configuration {
    /// Apply an `autocomplete` setting found either at the top level of
    /// `value` or nested under `lc3`. Missing keys leave the setting untouched.
    pub fn update_from(&mut self, value: &Value) {
        let setting = value
            .get("autocomplete")
            .or_else(|| value.get("lc3").and_then(|v| v.get("autocomplete")));
        if let Some(setting) = setting {
            self.autocomplete = match setting.as_str() {
                Some(s) => CompletionMode::parse_lenient(s),
                None => CompletionMode::None,
            };
        }
    }
}

type ModeGetter = Box<dyn Fn() -> String + Send + Sync>;

pub struct Backend {
    pub client: Client,
    pub document_map: DashMap<String, DocumentState>,
    pub config: Arc<RwLock<Configuration>>,
    pub provider: CompletionProvider<ModeGetter>,
}

struct TextDocumentItem {
    uri: Url,
    text: String,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        let config = Arc::new(RwLock::new(Configuration::default()));
        let source = config.clone();
        let getter: ModeGetter = Box::new(move || {
            let config = source.read().unwrap_or_else(|e| e.into_inner());
            config.autocomplete.to_string()
        });

        Backend {
            client,
            document_map: DashMap::new(),
            config,
            provider: CompletionProvider::new(getter),
        }
    }

    fn apply_settings(&self, value: &Value) -> CompletionMode {
        let mut config = self.config.write().unwrap_or_else(|e| e.into_inner());
        config.update_from(value);
        config.autocomplete
    }

    fn current_mode(&self) -> CompletionMode {
        self.provider.current_mode()
    }

    fn on_change(&self, params: TextDocumentItem) {
        self.document_map.insert(
            params.uri.to_string(),
            DocumentState {
                rope: Rope::from_str(&params.text),
            },
        );
    }

    /// Completion items for the document at `uri`, or `None` when the
    /// document is unknown or the position is outside it.
    pub fn completion_items(&self, uri: &str, position: Position) -> Option<Vec<CompletionItem>> {
        let doc = self.document_map.get(uri)?;
        let row = position.line as usize;
        let column = position.character as usize;

        let prefix = LineSource::line(&doc.rope, row)
            .map(|line| completions::word_before(&line, column).to_string())
            .unwrap_or_default();

        let mut items = None;
        self.provider.get_completions(
            &doc.rope,
            CursorPosition::new(row, column),
            &prefix,
            |err, suggestions| {
                if let Some(e) = err {
                    warn!("completion failed for {uri}: {e}");
                    return;
                }
                items = Some(suggestions.iter().map(completions::to_completion_item).collect());
            },
        );
        items
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options.as_ref() {
            let mode = self.apply_settings(options);
            debug!("initial autocomplete mode: {mode}");
        }

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "lc3-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            offset_encoding: None,
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        ..Default::default()
                    },
                )),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(true),
                    trigger_characters: Some(vec![".".to_string()]),
                    work_done_progress_options: Default::default(),
                    all_commit_characters: None,
                    completion_item: None,
                }),
                ..ServerCapabilities::default()
            },
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        debug!("initialized!");
        let mode = self.current_mode();
        self.client
            .log_message(
                MessageType::INFO,
                format!("lc3-lsp ready, autocomplete mode: {mode}"),
            )
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.on_change(TextDocumentItem {
            uri: params.text_document.uri,
            text: params.text_document.text,
        });
        debug!("file opened!");
    }

    async fn did_change(&self, mut params: DidChangeTextDocumentParams) {
        let Some(change) = params.content_changes.pop() else {
            return;
        };
        self.on_change(TextDocumentItem {
            uri: params.text_document.uri,
            text: change.text,
        });
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.document_map.remove(&params.text_document.uri.to_string());
        debug!("file closed!");
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let mode = self.apply_settings(&params.settings);
        debug!("configuration changed, autocomplete mode: {mode}");
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri.to_string();
        let position = params.text_document_position.position;
        debug!("completion requested for {uri} at {}:{}", position.line, position.character);

        Ok(self
            .completion_items(&uri, position)
            .map(CompletionResponse::Array))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        Ok(completions::resolve_completion_item(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tower_lsp::LspService;

    fn with_backend(f: impl FnOnce(&Backend)) {
        let (service, _socket) = LspService::new(Backend::new);
        f(service.inner());
    }

    fn open(backend: &Backend, uri: &str, text: &str) {
        backend.on_change(TextDocumentItem {
            uri: Url::parse(uri).unwrap(),
            text: text.to_string(),
        });
    }

    fn labels(items: &[CompletionItem]) -> Vec<&str> {
        items
            .iter()
            .filter(|i| i.kind == Some(CompletionItemKind::REFERENCE))
            .map(|i| i.label.as_str())
            .collect()
    }

    #[tokio::test]
    async fn initialized_reports_mode_through_client() {
        let (service, _socket) = LspService::new(Backend::new);
        let backend = service.inner();
        backend.apply_settings(&json!({ "autocomplete": "full" }));
        backend.initialized(InitializedParams {}).await;
        assert_eq!(backend.current_mode(), CompletionMode::Full);
    }

    #[tokio::test]
    async fn completion_resolve_fills_documentation() {
        let (service, _socket) = LspService::new(Backend::new);
        let backend = service.inner();
        let uri = "file:///tmp/r.asm";
        open(backend, uri, "ADD R1, R2, R3\n");
        backend.apply_settings(&json!({ "autocomplete": "basic" }));
        let items = backend.completion_items(uri, Position::new(0, 14)).unwrap();
        let ldr = items.into_iter().find(|i| i.label == "LDR").unwrap();
        let resolved = backend.completion_resolve(ldr).await.unwrap();
        assert!(resolved.documentation.is_some());
    }

    #[test]
    fn configuration_reads_top_level_and_nested() {
        let mut config = Configuration::default();
        config.update_from(&json!({ "autocomplete": "basic" }));
        assert_eq!(config.autocomplete, CompletionMode::Basic);
        config.update_from(&json!({ "lc3": { "autocomplete": "full" } }));
        assert_eq!(config.autocomplete, CompletionMode::Full);
    }

    #[test]
    fn configuration_ignores_unrelated_settings() {
        let mut config = Configuration {
            autocomplete: CompletionMode::Full,
        };
        config.update_from(&json!({ "editor": { "tabSize": 4 } }));
        assert_eq!(config.autocomplete, CompletionMode::Full);
    }

    #[test]
    fn configuration_invalid_values_disable_completion() {
        let mut config = Configuration {
            autocomplete: CompletionMode::Full,
        };
        config.update_from(&json!({ "autocomplete": "loud" }));
        assert_eq!(config.autocomplete, CompletionMode::None);
        config.autocomplete = CompletionMode::Basic;
        config.update_from(&json!({ "autocomplete": 3 }));
        assert_eq!(config.autocomplete, CompletionMode::None);
    }

    #[test]
    fn default_mode_offers_nothing() {
        with_backend(|backend| {
            open(backend, "file:///tmp/a.asm", "ADD R1, R2, R3\n");
            let items = backend.completion_items("file:///tmp/a.asm", Position::new(0, 14));
            assert_eq!(items, Some(Vec::new()));
        });
    }

    #[test]
    fn settings_change_applies_to_next_request() {
        with_backend(|backend| {
            let uri = "file:///tmp/b.asm";
            open(backend, uri, "LOOP ADD R1, R1, #1\nBRnzp LO\nDONE HALT\n");

            backend.apply_settings(&json!({ "autocomplete": "basic" }));
            let items = backend.completion_items(uri, Position::new(1, 8)).unwrap();
            assert!(labels(&items).is_empty());
            assert!(items.iter().any(|i| i.label == "R0"));

            backend.apply_settings(&json!({ "autocomplete": "full" }));
            let items = backend.completion_items(uri, Position::new(1, 8)).unwrap();
            assert_eq!(labels(&items), ["LOOP", "DONE"]);
        });
    }

    #[test]
    fn word_under_cursor_is_not_suggested() {
        with_backend(|backend| {
            let uri = "file:///tmp/c.asm";
            open(backend, uri, "LOOP ADD R1, R1, #1\nBRnzp LOOP\n");
            backend.apply_settings(&json!({ "autocomplete": "full" }));
            let items = backend.completion_items(uri, Position::new(1, 10)).unwrap();
            assert!(labels(&items).is_empty());
        });
    }

    #[test]
    fn unknown_document_or_row_yields_none() {
        with_backend(|backend| {
            backend.apply_settings(&json!({ "autocomplete": "basic" }));
            assert_eq!(backend.completion_items("file:///tmp/none.asm", Position::new(0, 0)), None);

            open(backend, "file:///tmp/d.asm", "HALT");
            assert_eq!(backend.completion_items("file:///tmp/d.asm", Position::new(7, 0)), None);
        });
    }
}
