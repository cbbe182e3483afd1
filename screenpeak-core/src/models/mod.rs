pub mod guide;
pub mod peak;
pub mod region;
pub mod track;
pub mod window;

// re-export for cleaner imports
pub use self::guide::{GuideClass, GuideRecord, Strand};
pub use self::peak::{CredibleInterval, PeakCall};
pub use self::region::Region;
pub use self::track::TrackSegment;
pub use self::window::Window;
