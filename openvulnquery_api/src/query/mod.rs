mod common;
pub use self::common::{ApiRequest, Query, ResponseShape};
mod filter;
pub use self::filter::{Filter, PublicationAspect, TemporalFilter};

mod topic;
pub use self::topic::{PathBuilder, Topic};
