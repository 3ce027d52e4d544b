//! Label templates.
//!
//! A [`Label`] is a runtime template plus positional params, rendered only
//! when a failure is reported. Placeholders follow format-string
//! conventions for positional arguments:
//!
//! - `{}` takes the next param in order
//! - `{N}` takes param `N` (zero-based)
//! - `{{` and `}}` are literal braces
//!
//! Every param must be used at least once.

use std::error::Error;
use std::fmt;

/// A label template with its positional params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    template: String,
    params: Vec<String>,
}

impl Label {
    /// Creates a label with no params.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            params: Vec::new(),
        }
    }

    /// Appends a positional param, rendered with `Display`.
    pub fn push(&mut self, param: impl fmt::Display) {
        self.params.push(param.to_string());
    }

    /// The raw template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The stored params, already rendered to strings.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Interpolates the params into the template.
    pub fn render(&self) -> Result<String, LabelError> {
        let mut out = String::with_capacity(self.template.len());
        let mut used = vec![false; self.params.len()];
        let mut next = 0;
        let mut chars = self.template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' => {
                    if chars.next_if(|&(_, c)| c == '{').is_some() {
                        out.push('{');
                        continue;
                    }
                    let mut inner = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, c)) => inner.push(c),
                            None => return Err(LabelError::UnclosedBrace { position: pos }),
                        }
                    }
                    let index = if inner.is_empty() {
                        let index = next;
                        next += 1;
                        index
                    } else {
                        inner.trim()
                            .parse::<usize>()
                            .map_err(|_| LabelError::InvalidPlaceholder { placeholder: inner })?
                    };
                    let param = self.params.get(index).ok_or(LabelError::MissingParam {
                        index,
                        available: self.params.len(),
                    })?;
                    used[index] = true;
                    out.push_str(param);
                }
                '}' => {
                    if chars.next_if(|&(_, c)| c == '}').is_some() {
                        out.push('}');
                    } else {
                        return Err(LabelError::UnmatchedBrace { position: pos });
                    }
                }
                c => out.push(c),
            }
        }

        let unused = used.iter().filter(|u| !**u).count();
        if unused > 0 {
            return Err(LabelError::UnusedParams { count: unused });
        }
        Ok(out)
    }
}

impl From<&str> for Label {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for Label {
    fn from(template: String) -> Self {
        Self::new(template)
    }
}

/// A label template that does not match its params.
///
/// This is a configuration bug at the guard's construction site, not a
/// failure of the guarded work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// A placeholder refers to a param that was never supplied.
    MissingParam { index: usize, available: usize },
    /// Some params are never referenced by the template.
    UnusedParams { count: usize },
    /// A `{` is never closed.
    UnclosedBrace { position: usize },
    /// A `}` appears without a matching `{`.
    UnmatchedBrace { position: usize },
    /// A placeholder is neither `{}` nor `{N}`.
    InvalidPlaceholder { placeholder: String },
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParam { index, available } => write!(
                f,
                "label refers to param {index} but only {available} were given"
            ),
            Self::UnusedParams { count } => {
                write!(f, "{count} label param(s) not used by the template")
            }
            Self::UnclosedBrace { position } => {
                write!(f, "unclosed '{{' at byte {position} in label template")
            }
            Self::UnmatchedBrace { position } => {
                write!(f, "unmatched '}}' at byte {position} in label template")
            }
            Self::InvalidPlaceholder { placeholder } => {
                write!(f, "invalid label placeholder '{{{placeholder}}}'")
            }
        }
    }
}

impl Error for LabelError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(template: &str, params: &[&str]) -> Label {
        let mut label = Label::new(template);
        for p in params {
            label.push(p);
        }
        label
    }

    #[test]
    fn renders_sequential_params() {
        let l = label("test {}", &["valueerror"]);
        assert_eq!(l.render().unwrap(), "test valueerror");
    }

    #[test]
    fn renders_indexed_params() {
        let l = label("{1} before {0}, then {1}", &["a", "b"]);
        assert_eq!(l.render().unwrap(), "b before a, then b");
    }

    #[test]
    fn renders_escaped_braces() {
        let l = label("{{literal}} {}", &["x"]);
        assert_eq!(l.render().unwrap(), "{literal} x");
    }

    #[test]
    fn template_without_params() {
        assert_eq!(Label::new("plain").render().unwrap(), "plain");
    }

    #[test]
    fn display_params_are_stringified_on_push() {
        let mut l = Label::new("port {} retry {}");
        l.push(8080);
        l.push(2.5);
        assert_eq!(l.params(), ["8080", "2.5"]);
        assert_eq!(l.render().unwrap(), "port 8080 retry 2.5");
    }

    #[test]
    fn missing_param_is_an_error() {
        let err = label("{} and {}", &["one"]).render().unwrap_err();
        assert_eq!(
            err,
            LabelError::MissingParam {
                index: 1,
                available: 1
            }
        );
    }

    #[test]
    fn unused_param_is_an_error() {
        let err = label("no placeholders", &["extra"]).render().unwrap_err();
        assert_eq!(err, LabelError::UnusedParams { count: 1 });
    }

    #[test]
    fn unclosed_brace_is_an_error() {
        let err = label("oops {", &[]).render().unwrap_err();
        assert_eq!(err, LabelError::UnclosedBrace { position: 5 });
    }

    #[test]
    fn unmatched_brace_is_an_error() {
        let err = label("oops }", &[]).render().unwrap_err();
        assert_eq!(err, LabelError::UnmatchedBrace { position: 5 });
    }

    #[test]
    fn invalid_placeholder_is_an_error() {
        let err = label("{name}", &["x"]).render().unwrap_err();
        assert_eq!(
            err,
            LabelError::InvalidPlaceholder {
                placeholder: "name".to_string()
            }
        );
        assert_eq!(err.to_string(), "invalid label placeholder '{name}'");
    }
}
