use crate::backend::DrawingContext;
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::layer::Painter;
use crate::painter::Recording;
use crate::rect::{Point, Rect, Size};
use crate::view::View;

/// A view tree attached to a drawing surface.
#[derive(Debug)]
pub struct Window<C> {
    root: View,
    context: C,
    size: Size,
}

impl<C: DrawingContext> Window<C> {
    /// Creates a window; the root view is resized to cover the whole surface.
    pub fn new(mut root: View, context: C, size: Size) -> Window<C> {
        root.set_frame(Rect::from_parts(Point::zero(), size));
        Window {
            root,
            context,
            size,
        }
    }

    pub fn root(&self) -> &View {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut View {
        &mut self.root
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.root.set_frame(Rect::from_parts(Point::zero(), size));
    }

    /// Updates and lays out the tree, then records it.
    pub fn record(&mut self) -> Recording {
        self.root.propagate_update();
        self.root.propagate_layout();

        let mut recording = self.context.begin_paint(self.size);
        let frame = self.root.frame();
        recording.painter().draw_layer(frame, &mut self.root);
        recording
    }

    /// Hands a recording to the drawing context.
    pub fn present(&mut self, recording: Recording) -> Result<bool> {
        self.context.end_paint(recording)
    }

    /// Records and presents one frame. Returns whether anything was presented.
    pub fn frame(&mut self) -> Result<bool> {
        let recording = self.record();
        self.present(recording)
    }
}

/// Drives frames for a set of windows.
///
/// Each window's tree is only ever touched by one thread at a time, so windows may record in
/// parallel; presenting happens on the calling thread, in window order.
#[derive(Debug)]
pub struct Host<C> {
    windows: Vec<Window<C>>,
    config: RenderConfig,
}

impl<C: DrawingContext + Send> Host<C> {
    pub fn new(config: RenderConfig) -> Host<C> {
        Host {
            windows: Vec::new(),
            config,
        }
    }

    /// Adds a window and returns its index.
    pub fn add_window(&mut self, window: Window<C>) -> usize {
        self.windows.push(window);
        self.windows.len() - 1
    }

    pub fn remove_window(&mut self, index: usize) -> Option<Window<C>> {
        if index < self.windows.len() {
            Some(self.windows.remove(index))
        } else {
            None
        }
    }

    pub fn windows(&self) -> &[Window<C>] {
        &self.windows
    }

    pub fn window_mut(&mut self, index: usize) -> Option<&mut Window<C>> {
        self.windows.get_mut(index)
    }

    /// Runs one frame for every window.
    ///
    /// Returns, per window, whether anything was presented. Every window is presented even if an
    /// earlier one fails; the first failure is returned afterwards, and windows that were not
    /// presented record their whole tree again on the next frame.
    pub fn frame(&mut self) -> Result<Vec<bool>> {
        let parallel = self.config.parallel_recording && self.windows.len() > 1;
        tracing::debug!(windows = self.windows.len(), parallel, "frame");

        let recordings: Vec<Option<Recording>> = if parallel {
            crossbeam::thread::scope(|scope| {
                let handles: Vec<_> = self
                    .windows
                    .iter_mut()
                    .map(|window| scope.spawn(move |_| window.record()))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| handle.join().ok())
                    .collect::<Vec<_>>()
            })
            .map_err(|_| Error::RecordingPanicked)?
        } else {
            self.windows
                .iter_mut()
                .map(|window| Some(window.record()))
                .collect()
        };

        let mut first_error = None;
        let mut presented = Vec::with_capacity(self.windows.len());
        for (index, (window, recording)) in self.windows.iter_mut().zip(recordings).enumerate() {
            let result = match recording {
                Some(recording) => window.present(recording),
                None => Err(Error::RecordingPanicked),
            };
            match result {
                Ok(shown) => presented.push(shown),
                Err(err) => {
                    tracing::warn!(window = index, %err, "frame not presented");
                    window.root_mut().set_needs_redraw();
                    presented.push(false);
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(presented),
        }
    }
}
