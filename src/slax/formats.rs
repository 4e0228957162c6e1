//! Output formats for the finished stylesheet tree
//!
//! - xml: indented markup with an XML declaration, the form the tree stands
//!   for
//! - treeviz: one line per node, for eyeballing structure
//! - json / yaml: serde dumps of the tree snapshot
//!
//! All formatters but xml consume a [`TreeSnapshot`] rather than walking the
//! arena themselves.

pub mod data;
pub mod registry;
pub mod snapshot;
pub mod treeviz;
pub mod xml;

pub use data::{JsonFormatter, YamlFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use snapshot::{snapshot_from_tree, TreeSnapshot};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
pub use xml::{to_xml_str, XmlFormatter};
