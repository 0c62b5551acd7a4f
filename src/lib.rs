//! # odk-transformer
//!
//! Turns ODK XForms into the HTML form and XML model that a web form
//! renderer consumes.
//!
//! ## Features
//!
//! - Media references (`jr://images/…`) resolved against a caller's map
//! - Language labels canonicalized to IANA tags, with text direction
//! - A small Markdown dialect in labels and hints
//! - Repairs for known structural transform artifacts (`setvalue` and
//!   `setgeopoint` actions, namespace declarations, `meta/instanceID`)
//!
//! The XSLT step itself is pluggable: implement [`Xslt`] for the engine of
//! your choice and hand it the form and model stylesheets.
//!
//! ## Quick Start
//!
//! ```no_run
//! use odk_transformer::{Stylesheets, Survey, Transformer, Xslt};
//! # fn engine() -> Box<dyn Xslt> { unimplemented!() }
//!
//! let stylesheets = Stylesheets::load("xsl/openrosa2html5form.xsl", "xsl/openrosa2xmlmodel.xsl")?;
//! let transformer = Transformer::new(engine(), stylesheets);
//!
//! let xform = std::fs::read_to_string("form.xml")?;
//! let survey = Survey::new(xform)
//!     .with_media("happy.jpg", "/media/happy.jpg")
//!     .with_theme("grid");
//!
//! let result = transformer.transform(survey)?;
//! println!("{}", result.form);
//! println!("{:?}", result.language_map);
//! # Ok::<(), odk_transformer::Error>(())
//! ```

pub mod dom;
pub mod error;
pub mod language;
pub mod markdown;
pub mod namespaces;
pub mod survey;
pub mod transform;
pub mod url;
pub(crate) mod util;
pub mod xslt;

pub use error::{BoxError, Error, Result};
pub use language::{Direction, Language, parse_language};
pub use survey::{Preprocess, Survey, TransformedSurvey};
pub use transform::{Transformer, transform};
pub use url::{MediaMap, escape_url_path, media_path};
pub use xslt::{Stylesheet, StylesheetKind, Stylesheets, Xslt, transformer_version};
