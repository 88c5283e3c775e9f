mod format;
pub use self::format::AdvisoryFormat;

mod advisory;
pub use self::advisory::{Advisory, AdvisoryCommon, CvrfAdvisory, IosAdvisory, OvalAdvisory};
