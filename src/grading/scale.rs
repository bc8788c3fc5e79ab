use crate::errors::{GradebookError, Result};
use crate::models::gradebook::entities::{GradeValue, LetterGrade};

/// 等级分界点，下界包含
#[derive(Debug, Clone, PartialEq)]
pub struct Breakpoint {
    pub min_percentage: f64,
    pub label: String,
}

impl Breakpoint {
    pub fn new(min_percentage: f64, label: impl Into<String>) -> Self {
        Self {
            min_percentage,
            label: label.into(),
        }
    }
}

/// 字母等级制
///
/// 分界点自上而下匹配，低于所有分界点时取 `floor`。
/// 调用方必须明确选择等级制：班级成绩册默认 `simple`，学生成绩单默认 `plus_minus`。
#[derive(Debug, Clone, PartialEq)]
pub struct LetterScale {
    name: String,
    breakpoints: Vec<Breakpoint>,
    floor: String,
}

impl LetterScale {
    pub const SIMPLE: &'static str = "simple";
    pub const PLUS_MINUS: &'static str = "plus_minus";

    pub fn new(
        name: impl Into<String>,
        mut breakpoints: Vec<Breakpoint>,
        floor: impl Into<String>,
    ) -> Self {
        breakpoints.sort_by(|a, b| b.min_percentage.total_cmp(&a.min_percentage));
        Self {
            name: name.into(),
            breakpoints,
            floor: floor.into(),
        }
    }

    /// 90 A / 80 B / 70 C / 60 D / 其余 F
    pub fn simple() -> Self {
        Self::new(
            Self::SIMPLE,
            vec![
                Breakpoint::new(90.0, "A"),
                Breakpoint::new(80.0, "B"),
                Breakpoint::new(70.0, "C"),
                Breakpoint::new(60.0, "D"),
            ],
            "F",
        )
    }

    /// 带 +/- 的细分等级
    pub fn plus_minus() -> Self {
        let bands = [
            (97.0, "A+"),
            (93.0, "A"),
            (90.0, "A-"),
            (87.0, "B+"),
            (83.0, "B"),
            (80.0, "B-"),
            (77.0, "C+"),
            (73.0, "C"),
            (70.0, "C-"),
            (67.0, "D+"),
            (63.0, "D"),
            (60.0, "D-"),
        ];
        Self::new(
            Self::PLUS_MINUS,
            bands
                .into_iter()
                .map(|(min, label)| Breakpoint::new(min, label))
                .collect(),
            "F",
        )
    }

    /// 按名称取内置等级制
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            Self::SIMPLE => Ok(Self::simple()),
            Self::PLUS_MINUS | "plus-minus" | "plusminus" => Ok(Self::plus_minus()),
            other => Err(GradebookError::validation(format!(
                "未知的等级制: '{other}'. 支持: simple, plus_minus"
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 百分比 → 字母成绩，不会失败
    ///
    /// 超过 100 落在最高档，NaN 落在最低档。
    pub fn classify(&self, percentage: f64) -> LetterGrade {
        if percentage.is_nan() {
            return LetterGrade(self.floor.clone());
        }
        let label = self
            .breakpoints
            .iter()
            .find(|bp| percentage >= bp.min_percentage)
            .map_or(&self.floor, |bp| &bp.label);
        LetterGrade(label.clone())
    }

    /// 未评分时没有字母成绩
    pub fn classify_value(&self, value: GradeValue) -> Option<LetterGrade> {
        value.as_option().map(|p| self.classify(p))
    }

    /// 从高到低的全部等级（含最低档）
    pub fn labels(&self) -> Vec<&str> {
        self.breakpoints
            .iter()
            .map(|bp| bp.label.as_str())
            .chain(std::iter::once(self.floor.as_str()))
            .collect()
    }
}
