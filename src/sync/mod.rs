pub mod traits;

#[cfg(feature = "sync-crossbeam")]
pub mod crossbeam;
#[cfg(feature = "sync-flume")]
pub mod flume;
#[cfg(feature = "sync-std")]
pub mod std;

#[cfg(feature = "sync-flume")]
pub use self::flume::FlumeTug;

#[cfg(feature = "sync-crossbeam")]
pub use self::crossbeam::CrossbeamTug;

#[cfg(feature = "sync-std")]
pub use self::std::StdTug;
