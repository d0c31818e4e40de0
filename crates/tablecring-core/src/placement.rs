//! Filter panel placement
//!
//! [`compute_placement`] is a pure function of three measurements. The
//! [`PopupPositioner`] feeds it from a [`LayoutSource`] and keeps the result
//! fresh while the panel is open by listening to `scroll` on an
//! [`EventTarget`]. The listener lives exactly as long as the open panel.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tablecring_view::{EventTarget, EventType, ListenerHandle, event_handler};

/// Default gap between the trigger's bottom edge and the panel, in pixels
pub const DEFAULT_OFFSET: f64 = 40.0;

/// Axis-aligned box in viewport pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
	/// Left edge
	pub left: f64,
	/// Top edge
	pub top: f64,
	/// Width
	pub width: f64,
	/// Height
	pub height: f64,
}

impl Rect {
	/// Creates a box
	pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
		Self {
			left,
			top,
			width,
			height,
		}
	}

	/// Right edge
	pub fn right(&self) -> f64 {
		self.left + self.width
	}

	/// Bottom edge
	pub fn bottom(&self) -> f64 {
		self.top + self.height
	}

	/// Horizontal centre
	pub fn center_x(&self) -> f64 {
		self.left + self.width / 2.0
	}

	/// Size of this box
	pub fn size(&self) -> Size {
		Size {
			width: self.width,
			height: self.height,
		}
	}
}

/// Width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
	/// Width
	pub width: f64,
	/// Height
	pub height: f64,
}

/// Where the panel goes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Placement {
	/// Top edge
	pub top: f64,
	/// Left edge
	pub left: f64,
	/// Never wider than the table
	pub max_width: f64,
}

impl Placement {
	/// Inline style for the panel element
	pub fn to_style(&self) -> String {
		format!(
			"position: fixed; top: {}px; left: {}px; max-width: {}px;",
			self.top, self.left, self.max_width
		)
	}
}

/// Places the panel under its trigger, kept inside the table horizontally.
///
/// The panel is centred on the trigger, then clamped so it never extends past
/// the container's left or right edge. There is no vertical clamping; a panel
/// may overflow the bottom of the viewport.
///
/// # Example
///
/// ```
/// use tablecring_core::placement::{Rect, Size, compute_placement};
///
/// let container = Rect::new(0.0, 0.0, 800.0, 600.0);
/// let trigger = Rect::new(10.0, 20.0, 20.0, 20.0);
/// let placement = compute_placement(trigger, container, Size { width: 300.0, height: 200.0 }, 40.0);
///
/// assert_eq!(placement.left, 0.0);
/// assert_eq!(placement.top, 80.0);
/// assert_eq!(placement.max_width, 800.0);
/// ```
pub fn compute_placement(trigger: Rect, container: Rect, panel: Size, offset: f64) -> Placement {
	let width = panel.width.min(container.width);
	let centred = trigger.center_x() - width / 2.0;
	let left = centred.min(container.right() - width).max(container.left);

	Placement {
		top: trigger.bottom() + offset,
		left,
		max_width: container.width,
	}
}

/// Measures elements by id
pub trait LayoutSource: Send + Sync {
	/// Bounding box of the element with `id`, if it is mounted
	fn bounding_rect(&self, id: &str) -> Option<Rect>;
}

/// In-memory layout for headless rendering and tests
#[derive(Debug, Default)]
pub struct StaticLayout {
	rects: RwLock<HashMap<String, Rect>>,
}

impl StaticLayout {
	/// Creates an empty layout
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the box of `id`
	pub fn set(&self, id: impl Into<String>, rect: Rect) {
		self.rects.write().insert(id.into(), rect);
	}

	/// Moves every box vertically by `dy`, as a scroll would
	pub fn scroll_by(&self, dy: f64) {
		for rect in self.rects.write().values_mut() {
			rect.top -= dy;
		}
	}
}

impl LayoutSource for StaticLayout {
	fn bounding_rect(&self, id: &str) -> Option<Rect> {
		self.rects.read().get(id).copied()
	}
}

/// Element ids the positioner measures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupTarget {
	/// Table container
	pub container_id: String,
	/// Header cell the panel belongs to; its button is `"{id_from}-button"`
	pub id_from: String,
	/// Panel element
	pub panel_id: String,
}

impl PopupTarget {
	/// Id of the trigger button
	pub fn trigger_id(&self) -> String {
		format!("{}-button", self.id_from)
	}
}

/// Keeps the open panel placed under its trigger
pub struct PopupPositioner {
	layout: Arc<dyn LayoutSource>,
	events: Arc<dyn EventTarget>,
	offset: f64,
	placement: Arc<Mutex<Option<Placement>>>,
	target: Option<PopupTarget>,
	scroll: Option<ListenerHandle>,
}

impl PopupPositioner {
	/// Creates a closed positioner
	pub fn new(layout: Arc<dyn LayoutSource>, events: Arc<dyn EventTarget>) -> Self {
		Self {
			layout,
			events,
			offset: DEFAULT_OFFSET,
			placement: Arc::new(Mutex::new(None)),
			target: None,
			scroll: None,
		}
	}

	/// Overrides the vertical gap
	pub fn with_offset(mut self, offset: f64) -> Self {
		self.offset = offset;
		self
	}

	/// Measures once and starts following scroll.
	///
	/// The panel element usually is not mounted yet when this runs, so the
	/// host calls [`refresh`](Self::refresh) once it is. Re-opening replaces
	/// the previous scroll listener.
	pub fn open(&mut self, target: PopupTarget) {
		// Release first so a re-open never holds two listeners.
		self.scroll = None;
		self.target = Some(target.clone());

		let remeasure = {
			let layout = Arc::clone(&self.layout);
			let placement = Arc::clone(&self.placement);
			let offset = self.offset;
			move || {
				let next = measure(layout.as_ref(), &target, offset);
				*placement.lock() = next;
			}
		};
		remeasure();

		self.scroll = Some(ListenerHandle::attach(
			Arc::clone(&self.events),
			EventType::Scroll,
			event_handler(move |_| remeasure()),
		));
		tracing::debug!("popup positioner following scroll");
	}

	/// Measures again against the current layout.
	///
	/// Does nothing while closed. Returns the new placement.
	pub fn refresh(&self) -> Option<Placement> {
		let target = self.target.as_ref()?;
		let next = measure(self.layout.as_ref(), target, self.offset);
		*self.placement.lock() = next;
		next
	}

	/// Stops following scroll and forgets the placement
	pub fn close(&mut self) {
		if self.scroll.take().is_some() {
			tracing::debug!("popup positioner released scroll listener");
		}
		self.target = None;
		*self.placement.lock() = None;
	}

	/// Latest placement; `None` when closed or when an element is missing
	pub fn placement(&self) -> Option<Placement> {
		*self.placement.lock()
	}

	/// Returns whether a scroll listener is held
	pub fn is_tracking(&self) -> bool {
		self.scroll.is_some()
	}
}

impl std::fmt::Debug for PopupPositioner {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PopupPositioner")
			.field("offset", &self.offset)
			.field("placement", &self.placement())
			.field("target", &self.target)
			.field("scroll", &self.scroll)
			.finish_non_exhaustive()
	}
}

fn measure(layout: &dyn LayoutSource, target: &PopupTarget, offset: f64) -> Option<Placement> {
	let container = layout.bounding_rect(&target.container_id);
	let trigger = layout.bounding_rect(&target.trigger_id());
	let panel = layout.bounding_rect(&target.panel_id);

	match (trigger, container, panel) {
		(Some(trigger), Some(container), Some(panel)) => {
			Some(compute_placement(trigger, container, panel.size(), offset))
		}
		_ => {
			tracing::trace!(id_from = %target.id_from, "popup elements not mounted");
			None
		}
	}
}
