use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

/// CSV 等文本输出里未评分的写法
pub const UNGRADED_TEXT: &str = "Not graded";

/// JSON 中未评分的哨兵值
pub const UNGRADED_SENTINEL: &str = "ungraded";

/// 百分比成绩或“尚未评分”
///
/// JSON 中序列化为数字，未评分时为字符串 `"ungraded"`，从不写成 0 或省略。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeValue {
    Graded(f64),
    Ungraded,
}

impl GradeValue {
    pub fn as_option(&self) -> Option<f64> {
        match self {
            GradeValue::Graded(v) => Some(*v),
            GradeValue::Ungraded => None,
        }
    }
}

impl From<Option<f64>> for GradeValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(GradeValue::Ungraded, GradeValue::Graded)
    }
}

impl fmt::Display for GradeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeValue::Graded(v) => write!(f, "{v:.1}"),
            GradeValue::Ungraded => f.write_str(UNGRADED_TEXT),
        }
    }
}

impl Serialize for GradeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GradeValue::Graded(v) => serializer.serialize_f64(*v),
            GradeValue::Ungraded => serializer.serialize_str(UNGRADED_SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for GradeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(GradeValue::Graded(v)),
            Raw::Text(s) if s == UNGRADED_SENTINEL => Ok(GradeValue::Ungraded),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "无效的成绩值: '{s}'. 只接受数字或 \"{UNGRADED_SENTINEL}\""
            ))),
        }
    }
}

/// 等级制下的字母成绩
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct LetterGrade(pub String);

impl LetterGrade {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 参与汇总的学生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct Student {
    pub id: i64,
    pub name: String,
}

/// 单个学生的周期成绩汇总，每次读取时计算，不落库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct StudentPeriodSummary {
    pub student_id: i64,
    #[ts(type = "Record<string, number | \"ungraded\">")]
    pub period_grades: BTreeMap<i64, GradeValue>,
    #[ts(type = "number | \"ungraded\"")]
    pub final_average: GradeValue,
}

/// 汇总时被跳过的记录类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub enum DiagnosticKind {
    OrphanGradeReference,
    InvalidTaskDefinition,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::OrphanGradeReference => f.write_str("orphan_grade_reference"),
            DiagnosticKind::InvalidTaskDefinition => f.write_str("invalid_task_definition"),
        }
    }
}

/// 汇总诊断：一条被跳过的成绩及原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct SummaryDiagnostic {
    pub kind: DiagnosticKind,
    pub student_id: i64,
    pub task_id: i64,
    pub grade_id: Option<i64>,
    pub message: String,
}
