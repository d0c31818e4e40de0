//! View tree and HTML serialisation.
//!
//! A [`View`] is the renderable output of every table component. It can be
//! serialised with [`View::render_to_string`] or walked by the embedding
//! application to mount it. Elements carry their event handlers so that the
//! host can wire them to real DOM events; tests fire them directly through
//! [`ElementView::fire`].

use std::borrow::Cow;
use std::sync::Arc;

/// DOM event kinds the table engine listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
	/// Mouse click / activation.
	Click,
	/// Text input.
	Input,
	/// Committed value change.
	Change,
	/// Form submission.
	Submit,
	/// Viewport scroll.
	Scroll,
}

impl EventType {
	/// Returns the DOM event name.
	pub fn as_str(&self) -> &'static str {
		match self {
			EventType::Click => "click",
			EventType::Input => "input",
			EventType::Change => "change",
			EventType::Submit => "submit",
			EventType::Scroll => "scroll",
		}
	}
}

/// Payload delivered to an event handler.
///
/// `value` mirrors `event.target.value` for input-like elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventData {
	/// Current value of the event target, if it has one.
	pub value: Option<String>,
}

impl EventData {
	/// Creates a payload carrying a target value.
	pub fn with_value(value: impl Into<String>) -> Self {
		Self {
			value: Some(value.into()),
		}
	}
}

/// Type alias for event handler functions.
pub type ViewEventHandler = Arc<dyn Fn(&EventData) + Send + Sync + 'static>;

/// A unified representation of renderable content.
#[derive(Debug, Clone)]
pub enum View {
	/// An element.
	Element(ElementView),
	/// A text node.
	Text(Cow<'static, str>),
	/// A fragment containing multiple views (no wrapper element).
	Fragment(Vec<View>),
	/// An empty view (renders nothing).
	Empty,
}

/// An element in the view tree.
#[derive(Clone)]
pub struct ElementView {
	tag: Cow<'static, str>,
	attrs: Vec<(Cow<'static, str>, Cow<'static, str>)>,
	children: Vec<View>,
	is_void: bool,
	event_handlers: Vec<(EventType, ViewEventHandler)>,
	stops: Vec<EventType>,
}

impl std::fmt::Debug for ElementView {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ElementView")
			.field("tag", &self.tag)
			.field("attrs", &self.attrs)
			.field("children", &self.children)
			.field("is_void", &self.is_void)
			.field("event_handlers_count", &self.event_handlers.len())
			.field("stops", &self.stops)
			.finish()
	}
}

impl ElementView {
	/// Creates a new element view.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		let tag = tag.into();
		let is_void = matches!(
			tag.as_ref(),
			"area" | "base" | "br" | "col" | "hr" | "img" | "input" | "link" | "meta" | "wbr"
		);
		Self {
			tag,
			attrs: Vec::new(),
			children: Vec::new(),
			is_void,
			event_handlers: Vec::new(),
			stops: Vec::new(),
		}
	}

	/// Adds an attribute.
	pub fn attr(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Adds an attribute only when `value` is `Some`.
	pub fn attr_opt(
		self,
		name: impl Into<Cow<'static, str>>,
		value: Option<impl Into<Cow<'static, str>>>,
	) -> Self {
		match value {
			Some(value) => self.attr(name, value),
			None => self,
		}
	}

	/// Shorthand for the `class` attribute.
	pub fn class(self, class: impl Into<Cow<'static, str>>) -> Self {
		self.attr("class", class)
	}

	/// Shorthand for the `id` attribute.
	pub fn id(self, id: impl Into<Cow<'static, str>>) -> Self {
		self.attr("id", id)
	}

	/// Adds a child view.
	pub fn child(mut self, child: impl IntoView) -> Self {
		self.children.push(child.into_view());
		self
	}

	/// Adds multiple child views.
	pub fn children(mut self, children: impl IntoIterator<Item = impl IntoView>) -> Self {
		self.children
			.extend(children.into_iter().map(|c| c.into_view()));
		self
	}

	/// Adds an event handler.
	pub fn on(mut self, event_type: EventType, handler: ViewEventHandler) -> Self {
		self.event_handlers.push((event_type, handler));
		self
	}

	/// Keeps `event_type` from bubbling past this element.
	///
	/// Serialised as `data-stop-propagation` so a host mounting the HTML can
	/// honour it; [`View::bubble`] honours it directly.
	pub fn stop_propagation(mut self, event_type: EventType) -> Self {
		if !self.stops.contains(&event_type) {
			self.stops.push(event_type);
		}
		self
	}

	/// Returns whether `event_type` stops at this element.
	pub fn stops_propagation(&self, event_type: EventType) -> bool {
		self.stops.contains(&event_type)
	}

	/// Returns the tag name.
	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	/// Returns the attributes.
	pub fn attrs(&self) -> &[(Cow<'static, str>, Cow<'static, str>)] {
		&self.attrs
	}

	/// Returns the value of the first attribute called `name`.
	pub fn get_attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_ref())
	}

	/// Returns whether the `class` attribute contains `class`.
	pub fn has_class(&self, class: &str) -> bool {
		self.get_attr("class")
			.is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
	}

	/// Returns the child views.
	pub fn child_views(&self) -> &[View] {
		&self.children
	}

	/// Returns whether this is a void element.
	pub fn is_void(&self) -> bool {
		self.is_void
	}

	/// Returns the event handlers.
	pub fn event_handlers(&self) -> &[(EventType, ViewEventHandler)] {
		&self.event_handlers
	}

	/// Invokes every handler registered for `event_type`.
	///
	/// Returns the number of handlers that ran.
	pub fn fire(&self, event_type: EventType, data: &EventData) -> usize {
		let mut fired = 0;
		for (kind, handler) in &self.event_handlers {
			if *kind == event_type {
				handler(data);
				fired += 1;
			}
		}
		fired
	}
}

impl View {
	/// Creates an element view.
	pub fn element(tag: impl Into<Cow<'static, str>>) -> ElementView {
		ElementView::new(tag)
	}

	/// Creates a text view.
	pub fn text(content: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(content.into())
	}

	/// Creates a fragment view.
	pub fn fragment(children: impl IntoIterator<Item = impl IntoView>) -> Self {
		Self::Fragment(children.into_iter().map(|c| c.into_view()).collect())
	}

	/// Creates an empty view.
	pub fn empty() -> Self {
		Self::Empty
	}

	/// Renders the view to an HTML string.
	pub fn render_to_string(&self) -> String {
		let mut output = String::new();
		self.render_to_string_inner(&mut output);
		output
	}

	fn render_to_string_inner(&self, output: &mut String) {
		match self {
			View::Element(el) => {
				output.push('<');
				output.push_str(el.tag_name());

				for (name, value) in el.attrs() {
					output.push(' ');
					output.push_str(name);
					output.push_str("=\"");
					output.push_str(&html_escape(value));
					output.push('"');
				}
				if !el.stops.is_empty() {
					let events: Vec<&str> = el.stops.iter().map(EventType::as_str).collect();
					output.push_str(" data-stop-propagation=\"");
					output.push_str(&events.join(" "));
					output.push('"');
				}

				if el.is_void() {
					output.push_str(" />");
				} else {
					output.push('>');
					for child in el.child_views() {
						child.render_to_string_inner(output);
					}
					output.push_str("</");
					output.push_str(el.tag_name());
					output.push('>');
				}
			}
			View::Text(text) => {
				output.push_str(&html_escape(text));
			}
			View::Fragment(children) => {
				for child in children {
					child.render_to_string_inner(output);
				}
			}
			View::Empty => {}
		}
	}

	/// Concatenated text of every text node, without markup.
	pub fn text_content(&self) -> String {
		let mut output = String::new();
		self.collect_text(&mut output);
		output
	}

	fn collect_text(&self, output: &mut String) {
		match self {
			View::Element(el) => {
				for child in el.child_views() {
					child.collect_text(output);
				}
			}
			View::Text(text) => output.push_str(text),
			View::Fragment(children) => {
				for child in children {
					child.collect_text(output);
				}
			}
			View::Empty => {}
		}
	}

	/// Depth-first search for the element whose `id` attribute equals `id`.
	pub fn find_by_id(&self, id: &str) -> Option<&ElementView> {
		self.find(&|el| el.get_attr("id") == Some(id))
	}

	/// Depth-first search for the first element matching `predicate`.
	pub fn find(&self, predicate: &dyn Fn(&ElementView) -> bool) -> Option<&ElementView> {
		match self {
			View::Element(el) => {
				if predicate(el) {
					return Some(el);
				}
				el.child_views().iter().find_map(|c| c.find(predicate))
			}
			View::Fragment(children) => children.iter().find_map(|c| c.find(predicate)),
			View::Text(_) | View::Empty => None,
		}
	}

	/// Fires `event_type` on the first element matching `target`, then on its
	/// ancestors innermost first, the way the DOM bubbles it.
	///
	/// Bubbling ends at an element marked with
	/// [`ElementView::stop_propagation`]. Returns the number of handlers that
	/// ran, or `None` when no element matches.
	pub fn bubble(
		&self,
		target: &dyn Fn(&ElementView) -> bool,
		event_type: EventType,
		data: &EventData,
	) -> Option<usize> {
		let mut path = Vec::new();
		if !self.path_to(target, &mut path) {
			return None;
		}
		let mut fired = 0;
		for el in path.iter().rev() {
			fired += el.fire(event_type, data);
			if el.stops_propagation(event_type) {
				break;
			}
		}
		Some(fired)
	}

	fn path_to<'a>(
		&'a self,
		target: &dyn Fn(&ElementView) -> bool,
		path: &mut Vec<&'a ElementView>,
	) -> bool {
		match self {
			View::Element(el) => {
				path.push(el);
				if target(el) || el.children.iter().any(|c| c.path_to(target, path)) {
					return true;
				}
				path.pop();
				false
			}
			View::Fragment(children) => children.iter().any(|c| c.path_to(target, path)),
			View::Text(_) | View::Empty => false,
		}
	}

	/// Collects every element matching `predicate`, in document order.
	pub fn find_all<'a>(&'a self, predicate: &dyn Fn(&ElementView) -> bool) -> Vec<&'a ElementView> {
		let mut found = Vec::new();
		self.find_all_inner(predicate, &mut found);
		found
	}

	fn find_all_inner<'a>(
		&'a self,
		predicate: &dyn Fn(&ElementView) -> bool,
		found: &mut Vec<&'a ElementView>,
	) {
		match self {
			View::Element(el) => {
				if predicate(el) {
					found.push(el);
				}
				for child in el.child_views() {
					child.find_all_inner(predicate, found);
				}
			}
			View::Fragment(children) => {
				for child in children {
					child.find_all_inner(predicate, found);
				}
			}
			View::Text(_) | View::Empty => {}
		}
	}
}

impl ElementView {
	/// Text content of this element's subtree.
	pub fn text_content(&self) -> String {
		let mut output = String::new();
		for child in &self.children {
			child.collect_text(&mut output);
		}
		output
	}
}

/// Trait for types that can be converted into a View.
pub trait IntoView {
	/// Converts self into a View.
	fn into_view(self) -> View;
}

impl IntoView for View {
	fn into_view(self) -> View {
		self
	}
}

impl IntoView for ElementView {
	fn into_view(self) -> View {
		View::Element(self)
	}
}

impl IntoView for String {
	fn into_view(self) -> View {
		View::Text(Cow::Owned(self))
	}
}

impl IntoView for &'static str {
	fn into_view(self) -> View {
		View::Text(Cow::Borrowed(self))
	}
}

impl<T: IntoView> IntoView for Option<T> {
	fn into_view(self) -> View {
		match self {
			Some(v) => v.into_view(),
			None => View::Empty,
		}
	}
}

impl<T: IntoView> IntoView for Vec<T> {
	fn into_view(self) -> View {
		View::Fragment(self.into_iter().map(|v| v.into_view()).collect())
	}
}

impl IntoView for () {
	fn into_view(self) -> View {
		View::Empty
	}
}

impl<A: IntoView, B: IntoView> IntoView for (A, B) {
	fn into_view(self) -> View {
		View::Fragment(vec![self.0.into_view(), self.1.into_view()])
	}
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}
