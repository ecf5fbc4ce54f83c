/// What a live browser environment exposes at the top level.
///
/// Full Safari exposes its own top-level namespace; a WKWebView hosted by an
/// app exposes the engine's message-handler bridge instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbeddingProbe {
    /// The standalone browser's top-level API surface is present.
    pub top_level_api: bool,
    /// The underlying web engine's bridge (`webkit.messageHandlers`) is present.
    pub engine_bridge: bool,
}

impl EmbeddingProbe {
    /// Engine bridge without the browser surface around it.
    pub fn is_restricted_embedding(&self) -> bool {
        self.engine_bridge && !self.top_level_api
    }
}
