/// A fixed, versioned enumeration that user input is filtered against before it reaches a query.
#[derive(Clone, Copy, Debug)]
pub struct AllowList {
	pub name: &'static str,
	pub values: &'static [&'static str],
}
impl AllowList {
	pub const fn new(name: &'static str, values: &'static [&'static str]) -> Self {
		Self { name, values }
	}

	pub fn contains(&self, value: &str) -> bool {
		self.canonical(value).is_some()
	}

	/// Returns the stored spelling for an exact (trimmed) match.
	pub fn canonical(&self, value: &str) -> Option<&'static str> {
		let trimmed = value.trim();

		self.values.iter().copied().find(|allowed| *allowed == trimmed)
	}

	/// Keeps only allowed values, in input order and without duplicates.
	pub fn retain<S>(&self, values: &[S]) -> Vec<&'static str>
	where
		S: AsRef<str>,
	{
		let mut kept: Vec<&'static str> = Vec::with_capacity(values.len());

		for value in values {
			if let Some(allowed) = self.canonical(value.as_ref())
				&& !kept.contains(&allowed)
			{
				kept.push(allowed);
			}
		}

		kept
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use crate::allow_list::AllowList;

	const COLORS: AllowList = AllowList::new("colors", &["Red", "Green"]);

	#[test]
	fn retain_keeps_order_and_drops_unknown() {
		let kept = COLORS.retain(&["Green", "Blue", " Red ", "Green"]);

		assert_eq!(kept, vec!["Green", "Red"]);
	}

	#[test]
	fn matching_is_case_sensitive() {
		assert!(!COLORS.contains("red"));
		assert!(COLORS.contains("Red"));
	}
}
