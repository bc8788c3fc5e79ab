use serde::Serialize;
use ts_rs::TS;

use super::entities::{GradeValue, LetterGrade, SummaryDiagnostic};

/// 成绩册表头中的周期
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct PeriodHeader {
    pub id: i64,
    pub name: String,
    pub weight: f64,
}

/// 成绩册中的一行（一个学生）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct GradebookRow {
    pub student_id: i64,
    pub student_name: String,
    #[ts(type = "Record<string, number | \"ungraded\">")]
    pub period_grades: std::collections::BTreeMap<i64, GradeValue>,
    #[ts(type = "number | \"ungraded\"")]
    pub final_average: GradeValue,
    pub letter: Option<LetterGrade>,
}

/// 班级成绩册
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct ClassGradebookResponse {
    pub class_id: i64,
    pub scale: String,
    pub periods: Vec<PeriodHeader>,
    pub rows: Vec<GradebookRow>,
    pub diagnostics: Vec<SummaryDiagnostic>,
    pub demo_data: bool,
}

/// 成绩单中的单个任务
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct TaskReport {
    pub task_id: i64,
    pub title: String,
    pub category_id: Option<i64>,
    pub max_points: f64,
    pub weight: f64,
    pub score: Option<f64>,
    #[ts(type = "number | \"ungraded\"")]
    pub percentage: GradeValue,
}

/// 成绩单中的单个类别
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct CategoryReport {
    pub category_id: i64,
    pub name: String,
    pub weight: f64,
    #[ts(type = "number | \"ungraded\"")]
    pub percentage: GradeValue,
}

/// 成绩单中的单个周期
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct PeriodReport {
    pub period_id: i64,
    pub name: String,
    pub weight: f64,
    #[ts(type = "number | \"ungraded\"")]
    pub percentage: GradeValue,
    pub letter: Option<LetterGrade>,
    pub categories: Vec<CategoryReport>,
    pub tasks: Vec<TaskReport>,
    pub graded_count: usize,
    pub ungraded_count: usize,
}

/// 学生成绩单
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct StudentReportResponse {
    pub class_id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub scale: String,
    pub periods: Vec<PeriodReport>,
    #[ts(type = "number | \"ungraded\"")]
    pub final_average: GradeValue,
    pub letter: Option<LetterGrade>,
    pub diagnostics: Vec<SummaryDiagnostic>,
}

/// 字母成绩分布中的一档
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct LetterBucket {
    pub label: String,
    pub count: usize,
}

/// 周期平均分
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct PeriodMean {
    pub period_id: i64,
    pub name: String,
    #[ts(type = "number | \"ungraded\"")]
    pub mean: GradeValue,
}

/// 班级统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct ClassStatsResponse {
    pub class_id: i64,
    pub scale: String,
    pub student_count: usize,
    pub graded_count: usize,
    pub ungraded_count: usize,
    #[ts(type = "number | \"ungraded\"")]
    pub mean: GradeValue,
    #[ts(type = "number | \"ungraded\"")]
    pub median: GradeValue,
    #[ts(type = "number | \"ungraded\"")]
    pub highest: GradeValue,
    #[ts(type = "number | \"ungraded\"")]
    pub lowest: GradeValue,
    pub period_means: Vec<PeriodMean>,
    pub distribution: Vec<LetterBucket>,
}
