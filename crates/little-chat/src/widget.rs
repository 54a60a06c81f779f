use std::time::Duration;

use little_chat_core::{
    Controller, ControllerBuilder, ControllerClosedError, ConversationState,
    InitOptions, SendDisposition,
};
use little_chat_http::{HttpChatService, HttpServiceConfigBuilder};
use little_chat_model::ChatService;
use tokio::sync::watch;

use crate::config::{Position, WidgetConfig};

/// A widget builder.
///
/// See [`ChatWidget`].
pub struct ChatWidgetBuilder {
    config: WidgetConfig,
    controller_builder: Option<ControllerBuilder>,
    exchange_timeout: Option<Duration>,
}

impl ChatWidgetBuilder {
    /// Creates a widget builder with the given properties.
    ///
    /// Unless another service is set, the widget talks to the HTTP chat
    /// service at [`WidgetConfig::api_url`].
    #[inline]
    pub fn with_config(config: WidgetConfig) -> Self {
        Self {
            config,
            controller_builder: None,
            exchange_timeout: None,
        }
    }

    /// Uses the given chat service instead of the HTTP one.
    #[inline]
    pub fn with_service<S: ChatService + 'static>(
        mut self,
        service: S,
    ) -> Self {
        self.controller_builder =
            Some(ControllerBuilder::with_service(service));
        self
    }

    /// Sets the exchange timeout of the controller.
    #[inline]
    pub fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = Some(timeout);
        self
    }

    /// Builds the widget and initializes its conversation.
    ///
    /// This must be called within a tokio runtime.
    pub async fn build(self) -> Result<ChatWidget, ControllerClosedError> {
        let Self {
            config,
            controller_builder,
            exchange_timeout,
        } = self;

        let mut controller_builder = controller_builder.unwrap_or_else(|| {
            let api_url = config.effective_api_url();
            debug!("using chat service at {api_url}");
            let service = HttpChatService::new(
                HttpServiceConfigBuilder::new()
                    .with_base_url(api_url)
                    .build(),
            );
            ControllerBuilder::with_service(service)
        });
        if let Some(timeout) = exchange_timeout {
            controller_builder =
                controller_builder.with_exchange_timeout(timeout);
        }

        let controller = controller_builder.build();
        controller
            .initialize(InitOptions {
                seed_greeting: Some(config.initial_message.clone()),
            })
            .await?;

        Ok(ChatWidget {
            controller,
            config,
            is_open: false,
        })
    }
}

/// A chat widget, like a launcher button that opens a window with the
/// messages and an input box.
///
/// The widget holds one conversation for its whole lifetime. Closing the
/// window keeps the messages, but dismisses the last error.
pub struct ChatWidget {
    controller: Controller,
    config: WidgetConfig,
    is_open: bool,
}

impl ChatWidget {
    /// Returns `true` if the chat window is shown.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Shows the chat window.
    #[inline]
    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Hides the chat window and dismisses the last error.
    pub async fn close(&mut self) -> Result<(), ControllerClosedError> {
        self.is_open = false;
        self.controller.reset().await
    }

    /// Opens the window if it's hidden, closes it otherwise.
    pub async fn toggle(&mut self) -> Result<(), ControllerClosedError> {
        if self.is_open {
            self.close().await
        } else {
            self.open();
            Ok(())
        }
    }

    /// Sends what the user typed.
    #[inline]
    pub async fn send_message(
        &self,
        text: &str,
    ) -> Result<SendDisposition, ControllerClosedError> {
        self.controller.send_user_turn(text).await
    }

    /// Returns what should currently be rendered.
    #[inline]
    pub fn state(&self) -> ConversationState {
        self.controller.state()
    }

    /// Returns a receiver that is notified whenever a re-render is needed.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.controller.subscribe()
    }

    /// Waits until the outstanding exchange, if any, has resolved.
    #[inline]
    pub async fn wait_idle(
        &self,
    ) -> Result<ConversationState, ControllerClosedError> {
        self.controller.wait_idle().await
    }

    /// Returns the hint text for the input box.
    #[inline]
    pub fn placeholder(&self) -> &str {
        &self.config.placeholder
    }

    /// Returns where the widget is placed.
    #[inline]
    pub fn position(&self) -> Position {
        self.config.position
    }

    /// Returns the properties this widget was built with.
    #[inline]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }
}
