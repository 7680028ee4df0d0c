use crate::core::geo::Point;
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Pointer and layout events delivered to a render surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Pointer moved over the container, in client (page) pixels
    Move { position: Point },
    /// Pointer left the container
    Leave,
    /// Container was resized to `size` pixels
    Resize { size: Point },
}

impl PointerEvent {
    /// Gets the position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Move { position } => Some(*position),
            _ => None,
        }
    }
}

/// Client-space bounding rectangle of a container element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Pointer offset from the container center in `[-1, 1]` on both axes,
    /// with y pointing up. Degenerate rectangles map everything to the center.
    pub fn normalized(&self, position: Point) -> Point {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Point::zero();
        }
        let x = ((position.x - self.left) / self.width) * 2.0 - 1.0;
        let y = -((position.y - self.top) / self.height) * 2.0 + 1.0;
        Point::new(x, y)
    }

    pub fn aspect(&self) -> f64 {
        if self.height <= 0.0 {
            1.0
        } else {
            self.width / self.height
        }
    }
}

/// Sending half handed to whatever delivers DOM events
#[derive(Debug, Clone)]
pub struct PointerEventSender(Sender<PointerEvent>);

impl PointerEventSender {
    /// Returns false once the receiving surface is gone
    pub fn send(&self, event: PointerEvent) -> bool {
        self.0.send(event).is_ok()
    }
}

/// Creates the queue between event delivery and the frame loop
pub fn pointer_channel() -> (PointerEventSender, Receiver<PointerEvent>) {
    let (tx, rx) = unbounded();
    (PointerEventSender(tx), rx)
}
