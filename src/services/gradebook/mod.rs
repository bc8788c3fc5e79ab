pub mod export;
pub mod report;
pub mod stats;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::config::{AppConfig, GradingConfig};
use crate::errors::Result;
use crate::grading::{LetterScale, demo_grades};
use crate::models::categories::entities::Category;
use crate::models::gradebook::entities::Student;
use crate::models::gradebook::requests::GradebookQuery;
use crate::models::grades::entities::Grade;
use crate::models::periods::entities::Period;
use crate::models::tasks::entities::Task;
use crate::storage::Storage;

pub struct GradebookService {
    storage: Option<Arc<dyn Storage>>,
}

/// 一次汇总计算所需的全部班级数据
pub(crate) struct ClassSnapshot {
    pub roster: Vec<Student>,
    pub periods: Vec<Period>,
    pub tasks_by_period: HashMap<i64, Vec<Task>>,
    pub categories: Vec<Category>,
    pub grades: Vec<Grade>,
    pub demo_data: bool,
}

impl GradebookService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 班级成绩册
    pub async fn class_summary(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: GradebookQuery,
    ) -> ActixResult<HttpResponse> {
        summary::class_summary(self, request, class_id, query).await
    }

    // 学生成绩单
    pub async fn student_report(
        &self,
        request: &HttpRequest,
        class_id: i64,
        student_id: i64,
        query: GradebookQuery,
    ) -> ActixResult<HttpResponse> {
        report::student_report(self, request, class_id, student_id, query).await
    }

    // 班级统计
    pub async fn class_stats(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: GradebookQuery,
    ) -> ActixResult<HttpResponse> {
        stats::class_stats(self, request, class_id, query).await
    }

    // 导出成绩册 CSV
    pub async fn export_csv(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: GradebookQuery,
    ) -> ActixResult<HttpResponse> {
        export::export_csv(self, request, class_id, query).await
    }
}

/// 解析请求中的等级制，未指定时使用配置默认值
pub(crate) fn resolve_scale(requested: Option<&str>, default: &str) -> Result<LetterScale> {
    match requested {
        Some(name) if !name.trim().is_empty() => LetterScale::from_name(name),
        _ => LetterScale::from_name(default),
    }
}

/// 取出成绩计算配置，应用数据中注册的优先，否则读取全局配置
pub(crate) fn grading_settings(request: &HttpRequest) -> GradingConfig {
    request
        .app_data::<web::Data<GradingConfig>>()
        .map(|data| data.get_ref().clone())
        .unwrap_or_else(|| AppConfig::get().effective_grading())
}

/// 加载班级名单、周期、类别、任务和成绩
///
/// 成绩读取失败且 `demo_fallback` 为真时，用随机成绩代替并标记 `demo_data`。
pub(crate) async fn load_snapshot(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    demo_fallback: bool,
) -> Result<ClassSnapshot> {
    let roster = storage.list_class_students(class_id).await?;
    let periods = storage.list_periods(class_id).await?;
    let categories = storage.list_categories(class_id, None).await?;
    let tasks = storage.list_tasks(class_id, None).await?;

    let (grades, demo_data) = match storage.list_grades(class_id).await {
        Ok(grades) => (grades, false),
        Err(e) if demo_fallback => {
            warn!(
                "Failed to load grades for class {}, using demo data: {}",
                class_id, e
            );
            (demo_grades(class_id, &roster, &tasks, &mut rand::rng()), true)
        }
        Err(e) => return Err(e),
    };

    Ok(ClassSnapshot {
        roster,
        periods,
        tasks_by_period: group_by_period(tasks),
        categories,
        grades,
        demo_data,
    })
}

pub(crate) fn group_by_period(tasks: Vec<Task>) -> HashMap<i64, Vec<Task>> {
    let mut map: HashMap<i64, Vec<Task>> = HashMap::new();
    for task in tasks {
        map.entry(task.period_id).or_default().push(task);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_scale() {
        assert_eq!(resolve_scale(None, "simple").unwrap().name(), "simple");
        assert_eq!(
            resolve_scale(Some("plus_minus"), "simple").unwrap().name(),
            "plus_minus"
        );
        assert_eq!(resolve_scale(Some("  "), "simple").unwrap().name(), "simple");
        assert!(resolve_scale(Some("gpa"), "simple").is_err());
    }
}
