use std::fmt;

#[derive(Debug)]
pub enum FormsError {
    /// Reading or writing a file failed
    Io { path: String, source: std::io::Error },

    /// YAML parsing failed (page fixtures, replay scripts, config)
    YamlParse { context: String, source: serde_yaml::Error },

    /// JSON parsing or serialization failed
    Json { context: String, source: serde_json::Error },

    /// HTTP call to the backend API failed
    Http { endpoint: String, source: reqwest::Error },

    /// Backend answered but reported failure
    Api { endpoint: String, message: String },

    /// A form referenced by a script or command is not on the page
    FormNotFound(String),

    /// A control referenced by a script or command is not in the form
    ControlNotFound { form: String, control: String },

    /// A link referenced by a script is not on the page
    LinkNotFound(String),
}

impl fmt::Display for FormsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormsError::Io { path, source } => {
                write!(f, "I/O error on '{}': {}", path, source)
            }
            FormsError::YamlParse { context, source } => {
                write!(f, "YAML parse error ({}): {}", context, source)
            }
            FormsError::Json { context, source } => {
                write!(f, "JSON error ({}): {}", context, source)
            }
            FormsError::Http { endpoint, source } => {
                write!(f, "Request to {} failed: {}", endpoint, source)
            }
            FormsError::Api { endpoint, message } => {
                write!(f, "{} reported failure: {}", endpoint, message)
            }
            FormsError::FormNotFound(form) => {
                write!(f, "Form '{}' not found on page", form)
            }
            FormsError::ControlNotFound { form, control } => {
                write!(f, "Control '{}' not found in form '{}'", control, form)
            }
            FormsError::LinkNotFound(href) => {
                write!(f, "Link '{}' not found on page", href)
            }
        }
    }
}

impl std::error::Error for FormsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormsError::Io { source, .. } => Some(source),
            FormsError::YamlParse { source, .. } => Some(source),
            FormsError::Json { source, .. } => Some(source),
            FormsError::Http { source, .. } => Some(source),
            _ => None,
        }
    }
}
