pub mod lens;
pub mod pose;
pub mod ray;
pub mod snap;

pub use lens::CameraLens;
pub use pose::Pose;
pub use ray::Ray;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Unit quaternion rotation.
pub type UnitQuat = nalgebra::UnitQuaternion<f64>;

/// Rigid transform (rotation + translation).
pub type Isometry3 = nalgebra::Isometry3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
