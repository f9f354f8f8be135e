//! Civic AI Common Library
//!
//! プロキシサーバとCLIで共有される型とユーティリティ

pub mod types;
pub mod error;
pub mod prompts;
pub mod parser;

pub use types::{
    AnalysisRequest, AnalysisResult, ContentPart, ErrorBody, ImageUrl, PriorityLevel, Severity,
};
pub use error::{Error, Result};
pub use prompts::{build_user_content, PERMISSIVE_SYSTEM_PROMPT, VALIDATING_SYSTEM_PROMPT};
pub use parser::{parse_analysis_response, strip_code_fences, ParsedAnalysis};
