//! compta-invoice: tenant and owner management-fee invoices from CSV, rendered
//! as one printable HTML document with one invoice per page.

pub mod error;
pub mod model;
pub mod render;
pub mod sheet;
pub mod vat;

pub use error::InvoiceError;
pub use model::{Invoice, InvoiceKind, InvoiceLine};
pub use render::{Issuer, RenderOptions, render_html};
pub use sheet::parse_invoices;
pub use vat::{VatSplit, split_ttc};
