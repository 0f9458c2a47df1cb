//! Main language server implementation

use std::path::Path;
use std::sync::Arc;

use crate::features::code_lens::code_lenses;
use crate::features::commands::{self, PreviewCommand};
use crate::features::completion::to_completion_item;
use crate::features::diagnostics::makeinfo_diagnostics;
use crate::features::document_symbols::document_symbols;
use crate::features::folding_ranges::folding_ranges;
use serde_json::Value;
use texinfo::{
    DocumentId, DocumentRegistry, EditRange, FoldRange, LineSource, NodeMarker, OutlineNode,
    Position as DocPosition, TextDocument, TextEdit,
};
use texinfo_analysis::completion::{completion_items, CompletionCandidate, CompletionTrigger};
use texinfo_babel::{Conversion, ConvertError, Converter};
use texinfo_config::{CompletionConfig, ConfigError, Loader, TexinfoConfig};
use tokio::sync::RwLock;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::{
    CodeLens, CodeLensOptions, CodeLensParams, CompletionOptions, CompletionParams,
    CompletionResponse, CompletionTriggerKind, Diagnostic, DidChangeConfigurationParams,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DidSaveTextDocumentParams, DocumentSymbol, DocumentSymbolParams, DocumentSymbolResponse,
    ExecuteCommandOptions, ExecuteCommandParams, FoldingRange, FoldingRangeParams,
    FoldingRangeProviderCapability, InitializeParams, InitializeResult, InitializedParams, OneOf,
    Position, Range, SaveOptions, ServerCapabilities, ServerInfo, TextDocumentItem,
    TextDocumentSyncCapability, TextDocumentSyncKind, TextDocumentSyncOptions,
    TextDocumentSyncSaveOptions, Url,
};
use tower_lsp::Client;

#[async_trait]
pub trait LspClient: Send + Sync + Clone + 'static {
    async fn publish_diagnostics(
        &self,
        uri: Url,
        diagnostics: Vec<Diagnostic>,
        version: Option<i32>,
    );
}

#[async_trait]
impl LspClient for Client {
    async fn publish_diagnostics(
        &self,
        uri: Url,
        diagnostics: Vec<Diagnostic>,
        version: Option<i32>,
    ) {
        Client::publish_diagnostics(self, uri, diagnostics, version).await;
    }
}

pub trait FeatureProvider: Send + Sync + 'static {
    fn folding_ranges(&self, ranges: &[FoldRange]) -> Vec<FoldingRange>;
    fn document_symbols(
        &self,
        outline: &[OutlineNode],
        document: &TextDocument,
    ) -> Vec<DocumentSymbol>;
    fn code_lenses(&self, nodes: &[NodeMarker]) -> Vec<CodeLens>;
    fn completions(
        &self,
        line_text: &str,
        character: usize,
        trigger: CompletionTrigger,
        config: &CompletionConfig,
    ) -> Vec<CompletionCandidate>;
    /// Convert the file at `input` to HTML. Runs on a blocking thread.
    fn convert(
        &self,
        input: &Path,
        config: &TexinfoConfig,
    ) -> std::result::Result<Conversion, ConvertError>;
}

#[derive(Default)]
pub struct DefaultFeatureProvider;

impl DefaultFeatureProvider {
    pub fn new() -> Self {
        Self
    }
}

impl FeatureProvider for DefaultFeatureProvider {
    fn folding_ranges(&self, ranges: &[FoldRange]) -> Vec<FoldingRange> {
        folding_ranges(ranges)
    }

    fn document_symbols(
        &self,
        outline: &[OutlineNode],
        document: &TextDocument,
    ) -> Vec<DocumentSymbol> {
        document_symbols(outline, document)
    }

    fn code_lenses(&self, nodes: &[NodeMarker]) -> Vec<CodeLens> {
        code_lenses(nodes)
    }

    fn completions(
        &self,
        line_text: &str,
        character: usize,
        trigger: CompletionTrigger,
        config: &CompletionConfig,
    ) -> Vec<CompletionCandidate> {
        completion_items(line_text, character, trigger, config)
    }

    fn convert(
        &self,
        input: &Path,
        config: &TexinfoConfig,
    ) -> std::result::Result<Conversion, ConvertError> {
        Converter::from_config(config).to_html(input)
    }
}

fn document_id(uri: &Url) -> DocumentId {
    DocumentId::new(uri.as_str())
}

fn to_doc_position(position: Position) -> DocPosition {
    DocPosition::new(position.line as usize, position.character as usize)
}

fn to_text_edit(range: Range, text: String) -> TextEdit {
    TextEdit::new(
        EditRange::new(to_doc_position(range.start), to_doc_position(range.end)),
        text,
    )
}

/// Settings sent by the client, optionally nested under a `texinfo` key, layered over the
/// built-in defaults.
fn config_from_settings(settings: &Value) -> std::result::Result<TexinfoConfig, ConfigError> {
    let settings = settings.get("texinfo").unwrap_or(settings);
    let loader = Loader::new();
    let loader = if settings.is_object() {
        loader.with_json_str(&settings.to_string())
    } else {
        loader
    };
    loader.build()
}

pub struct TexinfoLanguageServer<C = Client, P = DefaultFeatureProvider> {
    client: C,
    documents: RwLock<DocumentRegistry>,
    config: RwLock<TexinfoConfig>,
    features: Arc<P>,
}

impl TexinfoLanguageServer<Client, DefaultFeatureProvider> {
    pub fn new(client: Client, config: TexinfoConfig) -> Self {
        Self::with_features(client, Arc::new(DefaultFeatureProvider::new()), config)
    }
}

impl<C, P> TexinfoLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    pub fn with_features(client: C, features: Arc<P>, config: TexinfoConfig) -> Self {
        Self {
            client,
            documents: RwLock::new(DocumentRegistry::new()),
            config: RwLock::new(config),
            features,
        }
    }

    async fn config(&self) -> TexinfoConfig {
        self.config.read().await.clone()
    }

    async fn update_config(&self, settings: &Value) {
        match config_from_settings(settings) {
            Ok(config) => {
                tracing::debug!("configuration updated");
                *self.config.write().await = config;
            }
            Err(err) => tracing::warn!(error = %err, "ignoring invalid configuration"),
        }
    }

    /// Run makeinfo off the async runtime.
    async fn convert(&self, path: &Path) -> std::result::Result<Conversion, ConvertError> {
        let features = Arc::clone(&self.features);
        let config = self.config().await;
        let path = path.to_path_buf();
        match tokio::task::spawn_blocking(move || features.convert(&path, &config)).await {
            Ok(result) => result,
            Err(err) => Err(ConvertError::Io(std::io::Error::other(err.to_string()))),
        }
    }

    async fn publish_makeinfo_diagnostics(&self, uri: Url) {
        let Ok(path) = uri.to_file_path() else {
            tracing::debug!(%uri, "not a file, skipping makeinfo diagnostics");
            return;
        };
        let conversion = match self.convert(&path).await {
            Ok(conversion) => conversion,
            Err(err) => {
                tracing::warn!(%uri, error = %err, "makeinfo diagnostics unavailable");
                return;
            }
        };
        let diagnostics = {
            let documents = self.documents.read().await;
            let Some(context) = documents.get(&document_id(&uri)) else {
                return;
            };
            makeinfo_diagnostics(&conversion.log, &path.to_string_lossy(), context.document())
        };
        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }

    async fn render_preview(&self, uri: Url) -> Result<Option<Value>> {
        let path = uri
            .to_file_path()
            .map_err(|()| Error::invalid_params(format!("not a file URI: {uri}")))?;
        match self.convert(&path).await {
            Ok(conversion) => Ok(Some(commands::rendered(conversion))),
            Err(err) => {
                let mut error = Error::internal_error();
                error.message = err.to_string().into();
                Err(error)
            }
        }
    }
}

#[async_trait]
impl<C, P> tower_lsp::LanguageServer for TexinfoLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options.as_ref() {
            self.update_config(options).await;
        }

        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::INCREMENTAL),
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(false),
                    })),
                    ..TextDocumentSyncOptions::default()
                },
            )),
            folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
            document_symbol_provider: Some(OneOf::Left(true)),
            code_lens_provider: Some(CodeLensOptions {
                resolve_provider: Some(false),
            }),
            completion_provider: Some(CompletionOptions {
                trigger_characters: Some(vec!["@".to_string()]),
                ..CompletionOptions::default()
            }),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: commands::commands(),
                ..ExecuteCommandOptions::default()
            }),
            ..ServerCapabilities::default()
        };

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: "texinfo-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        tracing::info!("texinfo language server initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        self.documents.write().await.clear();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let TextDocumentItem { uri, text, .. } = params.text_document;
        self.documents.write().await.create(document_id(&uri), text);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let id = document_id(&params.text_document.uri);
        let mut documents = self.documents.write().await;
        let Some(context) = documents.get_mut(&id) else {
            tracing::warn!(document = %id, "change for a document that is not open");
            return;
        };
        for change in params.content_changes {
            match change.range {
                Some(range) => {
                    context.apply_edits(&[to_text_edit(range, change.text)]);
                }
                None => context.replace_text(change.text),
            }
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(rescan) = self
            .documents
            .write()
            .await
            .get_mut(&document_id(&uri))
            .map(|context| context.on_save())
        else {
            return;
        };
        tracing::debug!(%uri, rescan, "document saved");
        if self.config.read().await.diagnostics.on_save {
            self.publish_makeinfo_diagnostics(uri).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.write().await.destroy(&document_id(&uri));
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.update_config(&params.settings).await;
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        let mut documents = self.documents.write().await;
        if let Some(context) = documents.get_mut(&document_id(&params.text_document.uri)) {
            Ok(Some(self.features.folding_ranges(context.ranges())))
        } else {
            Ok(None)
        }
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let mut documents = self.documents.write().await;
        if let Some(context) = documents.get_mut(&document_id(&params.text_document.uri)) {
            let outline = context.outline().to_vec();
            let symbols = self.features.document_symbols(&outline, context.document());
            Ok(Some(DocumentSymbolResponse::Nested(symbols)))
        } else {
            Ok(None)
        }
    }

    async fn code_lens(&self, params: CodeLensParams) -> Result<Option<Vec<CodeLens>>> {
        if !self.config.read().await.code_lens.enabled {
            return Ok(None);
        }
        let mut documents = self.documents.write().await;
        if let Some(context) = documents.get_mut(&document_id(&params.text_document.uri)) {
            Ok(Some(self.features.code_lenses(context.nodes())))
        } else {
            Ok(None)
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position.position;
        let trigger = match params.context.map(|context| context.trigger_kind) {
            Some(CompletionTriggerKind::TRIGGER_CHARACTER) => CompletionTrigger::Character,
            _ => CompletionTrigger::Invoked,
        };
        let completion_config = self.config.read().await.completion;

        let documents = self.documents.read().await;
        let uri = &params.text_document_position.text_document.uri;
        let Some(context) = documents.get(&document_id(uri)) else {
            return Ok(None);
        };
        let line = position.line as usize;
        if line >= context.line_count() {
            return Ok(None);
        }
        let line_text = context.document().line_at(line);
        let candidates = self.features.completions(
            line_text,
            position.character as usize,
            trigger,
            &completion_config,
        );
        if candidates.is_empty() {
            return Ok(None);
        }
        Ok(Some(CompletionResponse::Array(
            candidates.iter().map(to_completion_item).collect(),
        )))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        match commands::parse_command(&params.command, &params.arguments)? {
            PreviewCommand::GotoNode(name) => Ok(Some(commands::goto_node(&name))),
            PreviewCommand::Render(uri) => self.render_preview(uri).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::SAMPLE;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower_lsp::lsp_types::{
        CompletionContext, DiagnosticSeverity, PartialResultParams, TextDocumentContentChangeEvent,
        TextDocumentIdentifier, TextDocumentPositionParams, VersionedTextDocumentIdentifier,
        WorkDoneProgressParams,
    };
    use tower_lsp::LanguageServer;

    type Published = Arc<Mutex<Vec<(Url, Vec<Diagnostic>)>>>;

    #[derive(Clone, Default)]
    struct RecordingClient {
        published: Published,
    }

    #[async_trait]
    impl LspClient for RecordingClient {
        async fn publish_diagnostics(
            &self,
            uri: Url,
            diagnostics: Vec<Diagnostic>,
            _version: Option<i32>,
        ) {
            self.published.lock().unwrap().push((uri, diagnostics));
        }
    }

    #[derive(Default)]
    struct MockFeatureProvider {
        folding_called: AtomicUsize,
        symbols_called: AtomicUsize,
        lenses_called: AtomicUsize,
        completions_called: AtomicUsize,
        convert_called: AtomicUsize,
        last_completion: Mutex<Option<(String, usize, CompletionTrigger)>>,
        range_counts: Mutex<Vec<usize>>,
    }

    impl FeatureProvider for MockFeatureProvider {
        fn folding_ranges(&self, ranges: &[FoldRange]) -> Vec<FoldingRange> {
            self.folding_called.fetch_add(1, Ordering::SeqCst);
            self.range_counts.lock().unwrap().push(ranges.len());
            folding_ranges(ranges)
        }

        fn document_symbols(
            &self,
            outline: &[OutlineNode],
            document: &TextDocument,
        ) -> Vec<DocumentSymbol> {
            self.symbols_called.fetch_add(1, Ordering::SeqCst);
            document_symbols(outline, document)
        }

        fn code_lenses(&self, nodes: &[NodeMarker]) -> Vec<CodeLens> {
            self.lenses_called.fetch_add(1, Ordering::SeqCst);
            code_lenses(nodes)
        }

        fn completions(
            &self,
            line_text: &str,
            character: usize,
            trigger: CompletionTrigger,
            config: &CompletionConfig,
        ) -> Vec<CompletionCandidate> {
            self.completions_called.fetch_add(1, Ordering::SeqCst);
            *self.last_completion.lock().unwrap() =
                Some((line_text.to_string(), character, trigger));
            completion_items(line_text, character, trigger, config)
        }

        fn convert(
            &self,
            input: &Path,
            _config: &TexinfoConfig,
        ) -> std::result::Result<Conversion, ConvertError> {
            self.convert_called.fetch_add(1, Ordering::SeqCst);
            Ok(Conversion {
                html: Some("<p>mock</p>".to_string()),
                log: format!("{}:14: warning: mock warning\n", input.display()),
            })
        }
    }

    type TestServer = TexinfoLanguageServer<RecordingClient, MockFeatureProvider>;

    fn sample_uri() -> Url {
        Url::parse("file:///tmp/sample.texi").unwrap()
    }

    fn defaults() -> TexinfoConfig {
        texinfo_config::load_defaults().unwrap()
    }

    fn server() -> (TestServer, Arc<MockFeatureProvider>, RecordingClient) {
        let provider = Arc::new(MockFeatureProvider::default());
        let client = RecordingClient::default();
        let server =
            TexinfoLanguageServer::with_features(client.clone(), provider.clone(), defaults());
        (server, provider, client)
    }

    async fn open_sample_document(server: &TestServer) {
        server
            .did_open(DidOpenTextDocumentParams {
                text_document: TextDocumentItem {
                    uri: sample_uri(),
                    language_id: "texinfo".into(),
                    version: 1,
                    text: SAMPLE.to_string(),
                },
            })
            .await;
    }

    async fn request_folding(server: &TestServer) -> Option<Vec<FoldingRange>> {
        server
            .folding_range(FoldingRangeParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap()
    }

    async fn change(server: &TestServer, range: Option<Range>, text: &str) {
        server
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: sample_uri(),
                    version: 2,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range,
                    range_length: None,
                    text: text.to_string(),
                }],
            })
            .await;
    }

    fn completion_params(
        line: u32,
        character: u32,
        trigger: CompletionTriggerKind,
    ) -> CompletionParams {
        CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                position: Position::new(line, character),
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
            context: Some(CompletionContext {
                trigger_kind: trigger,
                trigger_character: None,
            }),
        }
    }

    #[tokio::test]
    async fn advertises_capabilities() {
        let (server, _, _) = server();
        let result = server.initialize(InitializeParams::default()).await.unwrap();
        let capabilities = result.capabilities;
        assert!(capabilities.folding_range_provider.is_some());
        assert!(capabilities.code_lens_provider.is_some());
        let completion = capabilities.completion_provider.unwrap();
        assert_eq!(completion.trigger_characters, Some(vec!["@".to_string()]));
        let commands = capabilities.execute_command_provider.unwrap().commands;
        assert!(commands.contains(&commands::COMMAND_RENDER_PREVIEW.to_string()));
    }

    #[tokio::test]
    async fn initialization_options_update_config() {
        let (server, _, _) = server();
        let params = InitializeParams {
            initialization_options: Some(serde_json::json!({
                "texinfo": { "code_lens": { "enabled": false } }
            })),
            ..InitializeParams::default()
        };
        server.initialize(params).await.unwrap();
        assert!(!server.config().await.code_lens.enabled);
    }

    #[tokio::test]
    async fn folding_range_uses_feature_provider() {
        let (server, provider, _) = server();
        open_sample_document(&server).await;

        let ranges = request_folding(&server).await.unwrap();
        assert_eq!(provider.folding_called.load(Ordering::SeqCst), 1);
        assert_eq!(ranges.len(), 5);
    }

    #[tokio::test]
    async fn folding_range_returns_none_when_document_missing() {
        let (server, provider, _) = server();
        assert!(request_folding(&server).await.is_none());
        assert_eq!(provider.folding_called.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn line_structure_edits_rescan() {
        let (server, provider, _) = server();
        open_sample_document(&server).await;
        request_folding(&server).await;

        // Drop the `@example` block by joining its three lines into one.
        let range = Range::new(Position::new(14, 0), Position::new(16, 12));
        change(&server, Some(range), "plain text").await;
        request_folding(&server).await;

        assert_eq!(*provider.range_counts.lock().unwrap(), vec![5, 4]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn single_line_edits_wait_for_save() {
        let (server, provider, client) = server();
        open_sample_document(&server).await;
        request_folding(&server).await;

        // `@end example` -> `@end exampl` leaves the block without a closer.
        let range = Range::new(Position::new(16, 11), Position::new(16, 12));
        change(&server, Some(range), "").await;
        request_folding(&server).await;

        server
            .did_save(DidSaveTextDocumentParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                text: None,
            })
            .await;
        request_folding(&server).await;

        assert_eq!(*provider.range_counts.lock().unwrap(), vec![5, 5, 4]);
        assert_eq!(provider.convert_called.load(Ordering::SeqCst), 1);
        let published = client.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        let (uri, diagnostics) = &published[0];
        assert_eq!(uri, &sample_uri());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range.start.line, 13);
        assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::WARNING));
    }

    #[tokio::test]
    async fn full_text_changes_replace_the_document() {
        let (server, provider, _) = server();
        open_sample_document(&server).await;
        change(&server, None, "@c one\n@c two").await;

        let ranges = request_folding(&server).await.unwrap();
        assert_eq!(ranges.len(), 1);
        assert_eq!(*provider.range_counts.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn close_forgets_document_and_clears_diagnostics() {
        let (server, _, client) = server();
        open_sample_document(&server).await;
        server
            .did_close(DidCloseTextDocumentParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
            })
            .await;

        assert!(request_folding(&server).await.is_none());
        let published = client.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert!(published[0].1.is_empty());
    }

    #[tokio::test]
    async fn document_symbols_call_feature_layer() {
        let (server, provider, _) = server();
        open_sample_document(&server).await;

        let response = server
            .document_symbol(DocumentSymbolParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();

        match response {
            DocumentSymbolResponse::Nested(symbols) => {
                assert_eq!(symbols.len(), 1);
                assert_eq!(symbols[0].name, "@chapter");
            }
            _ => panic!("unexpected symbol response"),
        }
        assert_eq!(provider.symbols_called.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn code_lenses_follow_configuration() {
        let (server, provider, _) = server();
        open_sample_document(&server).await;
        let params = || CodeLensParams {
            text_document: TextDocumentIdentifier { uri: sample_uri() },
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        };

        let lenses = server.code_lens(params()).await.unwrap().unwrap();
        assert_eq!(lenses.len(), 2);

        server
            .did_change_configuration(DidChangeConfigurationParams {
                settings: serde_json::json!({ "code_lens": { "enabled": false } }),
            })
            .await;
        assert!(server.code_lens(params()).await.unwrap().is_none());
        assert_eq!(provider.lenses_called.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_configuration_is_ignored() {
        let (server, _, _) = server();
        server
            .did_change_configuration(DidChangeConfigurationParams {
                settings: serde_json::json!({ "code_lens": { "enabled": "sometimes" } }),
            })
            .await;
        assert!(server.config().await.code_lens.enabled);
    }

    #[tokio::test]
    async fn completion_passes_line_and_trigger() {
        let (server, provider, _) = server();
        open_sample_document(&server).await;
        let end_of_text = Position::new(19, 5);
        change(&server, Some(Range::new(end_of_text, end_of_text)), " @").await;

        let response = server
            .completion(completion_params(19, 7, CompletionTriggerKind::TRIGGER_CHARACTER))
            .await
            .unwrap();
        match response {
            Some(CompletionResponse::Array(items)) => assert!(!items.is_empty()),
            other => panic!("unexpected completion response: {other:?}"),
        }
        assert_eq!(
            *provider.last_completion.lock().unwrap(),
            Some(("Text. @".to_string(), 7, CompletionTrigger::Character))
        );
    }

    #[tokio::test]
    async fn completion_is_empty_in_comments() {
        let (server, provider, _) = server();
        open_sample_document(&server).await;

        let response = server
            .completion(completion_params(9, 4, CompletionTriggerKind::INVOKED))
            .await
            .unwrap();
        assert!(response.is_none());
        assert_eq!(provider.completions_called.load(Ordering::SeqCst), 1);

        let response = server
            .completion(completion_params(400, 0, CompletionTriggerKind::INVOKED))
            .await
            .unwrap();
        assert!(response.is_none());
        assert_eq!(provider.completions_called.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn goto_command_returns_anchor() {
        let (server, _, _) = server();
        let value = server
            .execute_command(ExecuteCommandParams {
                command: commands::COMMAND_GOTO_NODE.to_string(),
                arguments: vec![serde_json::json!("First Steps")],
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value["anchor"], "First-Steps");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn render_command_uses_converter() {
        let (server, provider, _) = server();
        let value = server
            .execute_command(ExecuteCommandParams {
                command: commands::COMMAND_RENDER_PREVIEW.to_string(),
                arguments: vec![serde_json::json!(sample_uri().as_str())],
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value["html"], "<p>mock</p>");
        assert_eq!(provider.convert_called.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_command_is_rejected() {
        let (server, _, _) = server();
        let result = server
            .execute_command(ExecuteCommandParams {
                command: "texinfo.nothing".to_string(),
                arguments: Vec::new(),
                work_done_progress_params: Default::default(),
            })
            .await;
        assert!(result.is_err());
    }
}
