use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A normalized page request. Construct it with [`Pagination::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
	pub page: u32,
	pub page_size: u32,
}
impl Pagination {
	/// Coerces raw input into range: `page >= 1` (default 1), `1 <= page_size <= 100`
	/// (default 20). Never fails.
	pub fn normalize(page: Option<i64>, page_size: Option<i64>) -> Self {
		let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32;
		let page_size = page_size
			.unwrap_or(i64::from(DEFAULT_PAGE_SIZE))
			.clamp(1, i64::from(MAX_PAGE_SIZE)) as u32;

		Self { page, page_size }
	}

	pub fn offset(self) -> u64 {
		u64::from(self.page - 1) * u64::from(self.page_size)
	}

	/// One past the last row of this page in the overall ordering.
	pub fn window_end(self) -> u64 {
		self.offset() + u64::from(self.page_size)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
	pub page: u32,
	pub page_size: u32,
	pub total: u64,
	pub pages: u64,
}
impl PageMeta {
	pub fn new(pagination: Pagination, total: u64) -> Self {
		let pages = total.div_ceil(u64::from(pagination.page_size)).max(1);

		Self { page: pagination.page, page_size: pagination.page_size, total, pages }
	}
}
