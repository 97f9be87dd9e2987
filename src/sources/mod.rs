//! External data sources.
//!
//! The scraped sources fetch a page with [`http::fetch_html`] and hand the
//! decoded text to a pure `parse_*` function, so parsing can be tested on
//! saved snapshots.

pub mod finmind;
pub mod goodinfo;
pub mod http;
pub mod peicheng;
pub mod table;
pub mod twsthr;

pub use finmind::FinMindClient;
pub use goodinfo::{fetch_screened, parse_screened};
pub use http::{build_client, fetch_html};
pub use peicheng::{fetch_concentration, parse_concentration};
pub use twsthr::{fetch_shareholders, parse_shareholders};
