//! Sports Photo Search Common Library
//!
//! カタログ集約・検索条件の正規化・フィルタ・ページングなど、
//! I/Oを伴わない検索ロジック

pub mod types;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod form;
pub mod normalizer;
pub mod parser;
pub mod pager;
pub mod prompts;
pub mod session;
pub mod drive;

pub use types::{Column, FilterCriteria, GroupedPhoto, PhotoRecord, ResultPage, DEFAULT_RESULT_COUNT};
pub use catalog::{CatalogTable, GroupedCatalog};
pub use error::{Error, Result};
pub use filter::{filter, missing_columns};
pub use form::{apply_form, Activity, FilterForm, FilterSelection, FormOutcome};
pub use normalizer::{extract_result_count, normalize_fields, normalize_value, QueryFields};
pub use parser::{extract_json, parse_query_response};
pub use pager::{page, result_page};
pub use prompts::{build_query_prompt, ACTION_VOCABULARY, FORM_ACTIONS};
pub use session::SearchSession;
pub use drive::{resolve_links, DriveLink};
