//! Unbundled ES module dev server.
//!
//! Serves packages out of a `node_modules`-style tree to a browser doing
//! native `import`s: `/<name>.js` resolves a package's `main` file, and
//! the relative imports it triggers are resolved against that file's
//! directory using a context cookie and the `Referer` header.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod resolve;
pub mod server;
