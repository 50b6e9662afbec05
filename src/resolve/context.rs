//! Module context and its cookie carrier
//!
//! The context is the only state that survives between requests, and it
//! lives entirely on the client. One cookie holds one context, so a
//! browser tracks a single "current module" at a time: loading a second
//! top-level module replaces the first one's context.

use hyper::header::{HeaderMap, COOKIE};

const FIELD_DELIMITER: char = '|';

/// Which top-level module relative imports are resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContext {
    pub module_name: String,
    /// Entry file as named by the manifest, relative to the module directory
    pub entry_file: String,
}

impl ModuleContext {
    pub fn new(module_name: impl Into<String>, entry_file: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            entry_file: entry_file.into(),
        }
    }

    /// Serialize as `<module>|<entry>`, each field percent-encoded
    pub fn to_token(&self) -> String {
        format!(
            "{}{FIELD_DELIMITER}{}",
            urlencoding::encode(&self.module_name),
            urlencoding::encode(&self.entry_file)
        )
    }

    /// Parse a token produced by [`to_token`](Self::to_token).
    ///
    /// The token is client input: anything that is not exactly two
    /// non-empty fields with a plain module name yields `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        let mut fields = token.split(FIELD_DELIMITER);
        let (module, entry) = (fields.next()?, fields.next()?);
        if fields.next().is_some() {
            return None;
        }

        let module_name = urlencoding::decode(module).ok()?.into_owned();
        let entry_file = urlencoding::decode(entry).ok()?.into_owned();
        if entry_file.is_empty() || !is_module_segment(&module_name) {
            return None;
        }
        Some(Self {
            module_name,
            entry_file,
        })
    }
}

/// A single, non-special path segment
fn is_module_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Cookie-based transport for [`ModuleContext`]
#[derive(Debug, Clone)]
pub struct ContextCarrier {
    cookie_name: String,
}

impl ContextCarrier {
    pub fn new(cookie_name: &str) -> Self {
        Self {
            cookie_name: cookie_name.to_string(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// `Set-Cookie` value for `context`.
    ///
    /// No `Expires`/`Max-Age`: the cookie lives for the browser session.
    pub fn store(&self, context: &ModuleContext) -> String {
        format!(
            "{}={}; Path=/; SameSite=Lax",
            self.cookie_name,
            context.to_token()
        )
    }

    /// Recover the context from the request's `Cookie` headers
    pub fn load(&self, headers: &HeaderMap) -> Option<ModuleContext> {
        let token = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value.trim_matches('"'))?;
        ModuleContext::from_token(token)
    }
}
