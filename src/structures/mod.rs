// private sub-module defined in other files
mod line_segment;
mod node_key;
mod point2d;
mod polyline;

// exports identifiers from private sub-modules in the current module namespace
pub use self::line_segment::LineSegment;
pub use self::node_key::NodeKey;
pub use self::point2d::Point2D;
pub use self::polyline::Polyline;
