use crate::error::Result;

/// Result of a user action once it has crossed the client boundary: either the
/// value, or the message to show instead of it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Done(T),
    Warning(String),
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Outcome::Done(_) => None,
            Outcome::Warning(msg) => Some(msg),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::Warning(_) => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::Warning(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Done(value) => Outcome::Done(f(value)),
            Outcome::Warning(msg) => Outcome::Warning(msg),
        }
    }
}

impl<T: Default> Outcome<T> {
    pub fn unwrap_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Done(value),
            Err(e) => {
                let message = e.user_message();
                if e.is_validation() {
                    log::info!("Rejected before sending: {}", message);
                } else {
                    crate::log_warn!("{} ({})", message, e);
                }
                Outcome::Warning(message)
            }
        }
    }
}
