use iref::IriBuf;
use std::sync::Arc;

/// Maximum remote-context resolution depth.
///
/// Exceeding it is reported as a `context overflow` error.
pub const MAX_DEPTH: usize = 10;

/// Single frame of the context processing stack.
struct StackNode {
	/// Previous frame.
	previous: Option<Arc<StackNode>>,

	/// URL of the last loaded context.
	url: IriBuf,

	/// Number of frames, this one included.
	depth: usize,
}

impl StackNode {
	fn new(previous: Option<Arc<StackNode>>, url: IriBuf) -> StackNode {
		let depth = previous.as_ref().map(|p| p.depth).unwrap_or(0) + 1;
		StackNode {
			previous,
			url,
			depth,
		}
	}

	/// Checks if this frame or any parent holds the given URL.
	fn contains(&self, url: &IriBuf) -> bool {
		if self.url == *url {
			true
		} else {
			match &self.previous {
				Some(prev) => prev.contains(url),
				None => false,
			}
		}
	}
}

/// Context processing stack.
///
/// Contains the list of the loaded remote contexts, to detect inclusion
/// loops and bound the resolution depth.
#[derive(Clone, Default)]
pub struct ProcessingStack {
	head: Option<Arc<StackNode>>,
}

impl ProcessingStack {
	/// Creates a new empty processing stack.
	pub fn new() -> Self {
		Self::default()
	}

	/// Checks if the stack is empty.
	pub fn is_empty(&self) -> bool {
		self.head.is_none()
	}

	/// Current resolution depth.
	pub fn depth(&self) -> usize {
		self.head.as_ref().map(|h| h.depth).unwrap_or(0)
	}

	/// Checks if the given URL is already in the stack.
	pub fn cycle(&self, url: &IriBuf) -> bool {
		match &self.head {
			Some(head) => head.contains(url),
			None => false,
		}
	}

	/// Push a new URL to the stack, unless it is already in the stack.
	///
	/// Returns `true` if the URL was added, `false` if a loop has been
	/// detected.
	pub fn push(&mut self, url: IriBuf) -> bool {
		if self.cycle(&url) {
			false
		} else {
			let mut head = None;
			std::mem::swap(&mut head, &mut self.head);
			self.head = Some(Arc::new(StackNode::new(head, url)));
			true
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use iref::IriBuf;

	#[test]
	fn detects_cycles() {
		let mut stack = ProcessingStack::new();
		let a = IriBuf::new("http://example.org/a".to_string()).unwrap();
		let b = IriBuf::new("http://example.org/b".to_string()).unwrap();

		assert!(stack.push(a.clone()));
		assert!(stack.push(b));
		assert!(!stack.push(a));
		assert_eq!(stack.depth(), 2);
	}
}
