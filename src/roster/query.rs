/// Ordering applied to the visible records. The only way to move between
/// modes is [`SortMode::next`], which walks `None → Descending → Ascending →
/// None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    None,
    Descending,
    Ascending,
}

impl SortMode {
    /// Descending comes before ascending on purpose: the first press shows the
    /// best marks first.
    pub fn next(self) -> Self {
        match self {
            SortMode::None => SortMode::Descending,
            SortMode::Descending => SortMode::Ascending,
            SortMode::Ascending => SortMode::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::None => "Default",
            SortMode::Descending => "High to Low",
            SortMode::Ascending => "Low to High",
        }
    }
}

/// The query currently applied to the roster.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryState {
    pub(crate) course_filter: Option<String>,
    pub(crate) high_performers_only: bool,
    pub(crate) sort_mode: SortMode,
}

impl QueryState {
    pub fn course_filter(&self) -> Option<&str> {
        self.course_filter.as_deref()
    }

    pub fn high_performers_only(&self) -> bool {
        self.high_performers_only
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn is_default(&self) -> bool {
        *self == QueryState::default()
    }

    /// Human-readable tags for every non-default part of the query, in the
    /// order the controls appear on screen.
    pub fn active_filters(&self) -> Vec<String> {
        let mut tags = Vec::new();
        if let Some(course) = &self.course_filter {
            tags.push(format!("Course: {course}"));
        }
        if self.high_performers_only {
            tags.push("High Performers Only".to_string());
        }
        if self.sort_mode != SortMode::None {
            tags.push(format!("Sorted by Marks ({})", self.sort_mode.label()));
        }
        tags
    }

    /// An empty course name means "no filter".
    pub(crate) fn set_course_filter(&mut self, course: Option<String>) {
        self.course_filter = course.filter(|c| !c.is_empty());
    }
}
