use serde::{Deserialize, Serialize};

/// Página de resultados GraphQL (`{ nodes: [...] }`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

impl Priority {
    pub const SELECTABLE: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Unknown => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Низкий",
            Priority::Medium => "Средний",
            Priority::High => "Высокий",
            Priority::Unknown => "—",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::SELECTABLE.into_iter().find(|p| p.as_str() == value)
    }
}

/// Severidad compartida por test cases y defectos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Trivial,
    #[default]
    Minor,
    Normal,
    Major,
    Critical,
    #[serde(other)]
    Unknown,
}

impl Severity {
    pub const SELECTABLE: [Severity; 5] = [
        Severity::Trivial,
        Severity::Minor,
        Severity::Normal,
        Severity::Major,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trivial => "TRIVIAL",
            Severity::Minor => "MINOR",
            Severity::Normal => "NORMAL",
            Severity::Major => "MAJOR",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Trivial => "Тривиальная",
            Severity::Minor => "Незначительная",
            Severity::Normal => "Обычная",
            Severity::Major => "Серьезная",
            Severity::Critical => "Критическая",
            Severity::Unknown => "—",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::SELECTABLE.into_iter().find(|s| s.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessType {
    #[default]
    Public,
    Private,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::Public => "PUBLIC",
            AccessType::Private => "PRIVATE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestCaseStatus {
    #[default]
    Draft,
    Ready,
    #[serde(other)]
    Unknown,
}

impl TestCaseStatus {
    pub const SELECTABLE: [TestCaseStatus; 2] = [TestCaseStatus::Draft, TestCaseStatus::Ready];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestCaseStatus::Draft => "DRAFT",
            TestCaseStatus::Ready => "READY",
            TestCaseStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TestCaseStatus::Draft => "Черновик",
            TestCaseStatus::Ready => "Готов",
            TestCaseStatus::Unknown => "—",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::SELECTABLE.into_iter().find(|s| s.as_str() == value)
    }
}

/// Resultado de un test case dentro de un test run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    #[default]
    Passed,
    Failed,
    Skipped,
    #[serde(other)]
    Unknown,
}

impl ExecutionStatus {
    pub const SELECTABLE: [ExecutionStatus; 3] =
        [ExecutionStatus::Passed, ExecutionStatus::Failed, ExecutionStatus::Skipped];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Passed => "PASSED",
            ExecutionStatus::Failed => "FAILED",
            ExecutionStatus::Skipped => "SKIPPED",
            ExecutionStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::SELECTABLE.into_iter().find(|s| s.as_str() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExecutionStatus::Passed => "Пройден",
            ExecutionStatus::Failed => "Провален",
            ExecutionStatus::Skipped => "Пропущен",
            ExecutionStatus::Unknown => "—",
        }
    }
}
