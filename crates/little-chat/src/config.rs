use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "http://localhost:7860";
const DEFAULT_INITIAL_MESSAGE: &str = "Hi! I'm AI Simon. Think of me as Simon \
    but with 100% more memory retention and 0% coffee dependency.";
const DEFAULT_PLACEHOLDER: &str = "Type your message...";

/// Which corner of the page the widget sits in.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    /// Bottom right corner.
    #[default]
    BottomRight,
    /// Bottom left corner.
    BottomLeft,
}

/// Properties a host sets on the widget.
///
/// The (de)serialized form uses the property names hosts are used to:
/// `apiUrl`, `initialMessage`, `placeholder` and `position`. Missing
/// properties take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    /// Base URL of the chat service.
    pub api_url: String,
    /// Greeting shown before the user says anything. Empty for none.
    pub initial_message: String,
    /// Hint text for the input box.
    pub placeholder: String,
    /// Where the widget is placed.
    pub position: Position,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            initial_message: DEFAULT_INITIAL_MESSAGE.to_owned(),
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
            position: Position::default(),
        }
    }
}

impl WidgetConfig {
    /// Parses the properties from a JSON object.
    #[inline]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns the base URL to use, falling back to the default address
    /// when none is set.
    pub fn effective_api_url(&self) -> &str {
        if self.api_url.is_empty() {
            DEFAULT_API_URL
        } else {
            &self.api_url
        }
    }
}
