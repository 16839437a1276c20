/// A point in canvas units, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
}

impl CanvasPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The three primitives the radar needs from a drawing backend.
pub trait Surface {
    fn clear(&mut self, width: f32, height: f32);
    fn fill_circle(&mut self, center: CanvasPoint, radius: f32);
    fn line(&mut self, from: CanvasPoint, to: CanvasPoint);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f32, height: f32 },
    Circle { center: CanvasPoint, radius: f32 },
    Line { from: CanvasPoint, to: CanvasPoint },
}

/// Keeps every call in order. Backs the headless peers and the tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> impl Iterator<Item = CanvasPoint> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Circle { center, .. } => Some(*center),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (CanvasPoint, CanvasPoint)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { from, to } => Some((*from, *to)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f32, height: f32) {
        // a clear wipes everything drawn before it
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_circle(&mut self, center: CanvasPoint, radius: f32) {
        self.commands.push(DrawCommand::Circle { center, radius });
    }

    fn line(&mut self, from: CanvasPoint, to: CanvasPoint) {
        self.commands.push(DrawCommand::Line { from, to });
    }
}
