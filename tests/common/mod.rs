//! HTTP 测试共用的内存存储与应用构建

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use actix_web::web;
use rust_gradebook::cache::ObjectCache;
use rust_gradebook::cache::object_cache::moka::MokaCacheWrapper;
use rust_gradebook::config::GradingConfig;
use rust_gradebook::errors::{GradebookError, Result};
use rust_gradebook::models::categories::{entities::Category, requests::CreateCategoryRequest};
use rust_gradebook::models::class_users::{
    entities::{ClassUser, ClassUserRole},
    requests::ClassUserQuery,
    responses::ClassUserListResponse,
};
use rust_gradebook::models::classes::{
    entities::Class, requests::ClassListQuery, responses::ClassListResponse,
};
use rust_gradebook::models::gradebook::entities::Student;
use rust_gradebook::models::grades::{
    entities::Grade,
    requests::{GradeListQuery, UpsertGradeRequest},
    responses::GradeListResponse,
};
use rust_gradebook::models::periods::{entities::Period, requests::CreatePeriodRequest};
use rust_gradebook::models::tasks::{
    entities::Task,
    requests::{CreateTaskRequest, UpdateTaskRequest},
};
use rust_gradebook::models::users::entities::{User, UserRole, UserStatus};
use rust_gradebook::models::{AppStartTime, PaginationInfo};
use rust_gradebook::storage::Storage;
use rust_gradebook::utils::jwt::JwtUtils;

pub const TEST_SECRET: &str = "integration-test-secret";

pub const ADMIN_ID: i64 = 1;
pub const TEACHER_ID: i64 = 2;
/// 班级的第二位教师，只在限流测试中使用
pub const ASSISTANT_ID: i64 = 3;
pub const ANN_ID: i64 = 10;
pub const BEN_ID: i64 = 11;
pub const OUTSIDER_ID: i64 = 20;
pub const SUSPENDED_ID: i64 = 21;
pub const CLASS_ID: i64 = 100;

static INIT: Once = Once::new();

/// 在首次读取配置前设置测试密钥
pub fn setup() {
    INIT.call_once(|| {
        // SAFETY: 只在 Once 中执行一次，早于任何配置读取
        unsafe {
            std::env::set_var("JWT_SECRET", TEST_SECRET);
        }
    });
}

pub fn token_for(user_id: i64, role: &str) -> String {
    setup();
    JwtUtils::generate_token_with_expiry(TEST_SECRET, user_id, role, chrono::Duration::minutes(5))
        .expect("token")
}

pub fn bearer(user_id: i64, role: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(user_id, role)))
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    classes: Vec<Class>,
    class_users: Vec<ClassUser>,
    periods: Vec<Period>,
    categories: Vec<Category>,
    tasks: Vec<Task>,
    grades: Vec<Grade>,
    next_id: i64,
    fail_grades: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// 内存存储，仅用于测试
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
}

fn user(id: i64, name: &str, role: UserRole, status: UserStatus) -> User {
    User {
        id,
        username: name.to_lowercase(),
        email: format!("{}@example.com", name.to_lowercase()),
        role,
        status,
        display_name: Some(name.to_string()),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

fn member(id: i64, user_id: i64, role: ClassUserRole) -> ClassUser {
    ClassUser {
        id,
        class_id: CLASS_ID,
        user_id,
        profile_name: None,
        role,
        updated_at: chrono::Utc::now(),
        joined_at: chrono::Utc::now(),
    }
}

impl MemoryStorage {
    /// 一个班级：教师、两名学生，一个未入班用户和一个停用用户
    pub fn seeded() -> Self {
        let now = chrono::Utc::now();
        let state = State {
            users: vec![
                user(ADMIN_ID, "Admin", UserRole::Admin, UserStatus::Active),
                user(TEACHER_ID, "Teacher", UserRole::Teacher, UserStatus::Active),
                user(ASSISTANT_ID, "Tess", UserRole::Teacher, UserStatus::Active),
                user(ANN_ID, "Ann", UserRole::User, UserStatus::Active),
                user(BEN_ID, "Ben", UserRole::User, UserStatus::Active),
                user(OUTSIDER_ID, "Olly", UserRole::User, UserStatus::Active),
                user(SUSPENDED_ID, "Sam", UserRole::User, UserStatus::Suspended),
            ],
            classes: vec![Class {
                id: CLASS_ID,
                class_name: "Algebra".to_string(),
                description: None,
                teacher_id: TEACHER_ID,
                created_at: now,
                updated_at: now,
            }],
            class_users: vec![
                member(1, ANN_ID, ClassUserRole::Student),
                member(2, BEN_ID, ClassUserRole::Student),
                member(3, SUSPENDED_ID, ClassUserRole::Student),
                member(4, ASSISTANT_ID, ClassUserRole::Teacher),
            ],
            next_id: 1000,
            ..State::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn set_grades_failing(&self, failing: bool) {
        self.lock().fail_grades = failing;
    }

    pub fn grades(&self) -> Vec<Grade> {
        self.lock().grades.clone()
    }

    /// 直接写入一条成绩（可引用不存在的任务）
    pub fn insert_grade(&self, student_id: i64, task_id: i64, score: Option<f64>) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        state.grades.push(Grade {
            id,
            class_id: CLASS_ID,
            student_id,
            task_id,
            score,
            grader_id: Some(TEACHER_ID),
            comment: None,
            updated_at: chrono::Utc::now(),
        });
        id
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn page_info(page: Option<i64>, size: Option<i64>, total: usize) -> (usize, usize, PaginationInfo) {
    let page = page.unwrap_or(1).max(1);
    let size = size.unwrap_or(20).clamp(1, 100);
    let total_pages = (total as i64 + size - 1) / size;
    let skip = ((page - 1) * size) as usize;
    (
        skip,
        size as usize,
        PaginationInfo {
            page,
            page_size: size,
            total: total as i64,
            total_pages,
        },
    )
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        Ok(self.lock().classes.iter().find(|c| c.id == class_id).cloned())
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let state = self.lock();
        let items: Vec<Class> = state
            .classes
            .iter()
            .filter(|c| query.teacher_id.is_none_or(|t| c.teacher_id == t))
            .filter(|c| {
                query.member_id.is_none_or(|m| {
                    state
                        .class_users
                        .iter()
                        .any(|cu| cu.class_id == c.id && cu.user_id == m)
                })
            })
            .cloned()
            .collect();
        let (skip, take, pagination) = page_info(query.page, query.size, items.len());
        Ok(ClassListResponse {
            items: items.into_iter().skip(skip).take(take).collect(),
            pagination,
        })
    }

    async fn get_class_user_by_user_id_and_class_id(
        &self,
        user_id: i64,
        class_id: i64,
    ) -> Result<Option<ClassUser>> {
        Ok(self
            .lock()
            .class_users
            .iter()
            .find(|cu| cu.user_id == user_id && cu.class_id == class_id)
            .cloned())
    }

    async fn list_class_users_with_pagination(
        &self,
        class_id: i64,
        query: ClassUserQuery,
    ) -> Result<ClassUserListResponse> {
        let items: Vec<ClassUser> = self
            .lock()
            .class_users
            .iter()
            .filter(|cu| cu.class_id == class_id)
            .filter(|cu| query.role.as_ref().is_none_or(|r| &cu.role == r))
            .cloned()
            .collect();
        let (skip, take, pagination) = page_info(query.page, query.size, items.len());
        Ok(ClassUserListResponse {
            items: items.into_iter().skip(skip).take(take).collect(),
            pagination,
        })
    }

    async fn list_class_students(&self, class_id: i64) -> Result<Vec<Student>> {
        let state = self.lock();
        let mut students: Vec<Student> = state
            .class_users
            .iter()
            .filter(|cu| cu.class_id == class_id && cu.role == ClassUserRole::Student)
            .filter_map(|cu| state.users.iter().find(|u| u.id == cu.user_id))
            .map(|u| Student {
                id: u.id,
                name: u.name().to_string(),
            })
            .collect();
        students.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(students)
    }

    async fn list_periods(&self, class_id: i64) -> Result<Vec<Period>> {
        let mut periods: Vec<Period> = self
            .lock()
            .periods
            .iter()
            .filter(|p| p.class_id == class_id)
            .cloned()
            .collect();
        periods.sort_by_key(|p| (p.sort_order, p.id));
        Ok(periods)
    }

    async fn get_period(&self, class_id: i64, period_id: i64) -> Result<Option<Period>> {
        Ok(self
            .lock()
            .periods
            .iter()
            .find(|p| p.class_id == class_id && p.id == period_id)
            .cloned())
    }

    async fn create_period(&self, class_id: i64, req: CreatePeriodRequest) -> Result<Period> {
        let mut state = self.lock();
        let id = state.next_id();
        let now = chrono::Utc::now();
        let period = Period {
            id,
            class_id,
            name: req.name,
            weight: req.weight,
            start_date: req.start_date,
            end_date: req.end_date,
            sort_order: req.sort_order.unwrap_or(0),
            created_at: now,
            updated_at: now,
        };
        state.periods.push(period.clone());
        Ok(period)
    }

    async fn delete_period(&self, class_id: i64, period_id: i64) -> Result<bool> {
        let mut state = self.lock();
        let task_ids: Vec<i64> = state
            .tasks
            .iter()
            .filter(|t| t.class_id == class_id && t.period_id == period_id)
            .map(|t| t.id)
            .collect();
        state.grades.retain(|g| !task_ids.contains(&g.task_id));
        state.tasks.retain(|t| !task_ids.contains(&t.id));
        state
            .categories
            .retain(|c| !(c.class_id == class_id && c.period_id == period_id));
        let before = state.periods.len();
        state
            .periods
            .retain(|p| !(p.class_id == class_id && p.id == period_id));
        Ok(state.periods.len() < before)
    }

    async fn list_categories(
        &self,
        class_id: i64,
        period_id: Option<i64>,
    ) -> Result<Vec<Category>> {
        Ok(self
            .lock()
            .categories
            .iter()
            .filter(|c| c.class_id == class_id && period_id.is_none_or(|p| c.period_id == p))
            .cloned()
            .collect())
    }

    async fn get_category(&self, class_id: i64, category_id: i64) -> Result<Option<Category>> {
        Ok(self
            .lock()
            .categories
            .iter()
            .find(|c| c.class_id == class_id && c.id == category_id)
            .cloned())
    }

    async fn create_category(
        &self,
        class_id: i64,
        req: CreateCategoryRequest,
    ) -> Result<Category> {
        let mut state = self.lock();
        let id = state.next_id();
        let category = Category {
            id,
            class_id,
            period_id: req.period_id,
            name: req.name,
            weight: req.weight,
            created_at: chrono::Utc::now(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn list_tasks(&self, class_id: i64, period_id: Option<i64>) -> Result<Vec<Task>> {
        Ok(self
            .lock()
            .tasks
            .iter()
            .filter(|t| t.class_id == class_id && period_id.is_none_or(|p| t.period_id == p))
            .cloned()
            .collect())
    }

    async fn get_task(&self, class_id: i64, task_id: i64) -> Result<Option<Task>> {
        Ok(self
            .lock()
            .tasks
            .iter()
            .find(|t| t.class_id == class_id && t.id == task_id)
            .cloned())
    }

    async fn create_task(
        &self,
        class_id: i64,
        period_id: i64,
        req: CreateTaskRequest,
    ) -> Result<Task> {
        let mut state = self.lock();
        let id = state.next_id();
        let now = chrono::Utc::now();
        let task = Task {
            id,
            class_id,
            period_id,
            category_id: req.category_id,
            title: req.title,
            max_points: req.max_points,
            weight: req.weight,
            due_date: req.due_date,
            created_at: now,
            updated_at: now,
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        class_id: i64,
        task_id: i64,
        update: UpdateTaskRequest,
    ) -> Result<Option<Task>> {
        let mut state = self.lock();
        let Some(task) = state
            .tasks
            .iter_mut()
            .find(|t| t.class_id == class_id && t.id == task_id)
        else {
            return Ok(None);
        };
        if let Some(category_id) = update.category_id {
            task.category_id = Some(category_id);
        }
        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(max_points) = update.max_points {
            task.max_points = max_points;
        }
        if let Some(weight) = update.weight {
            task.weight = weight;
        }
        if let Some(due_date) = update.due_date {
            task.due_date = Some(due_date);
        }
        task.updated_at = chrono::Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, class_id: i64, task_id: i64) -> Result<bool> {
        let mut state = self.lock();
        state.grades.retain(|g| g.task_id != task_id);
        let before = state.tasks.len();
        state
            .tasks
            .retain(|t| !(t.class_id == class_id && t.id == task_id));
        Ok(state.tasks.len() < before)
    }

    async fn list_grades(&self, class_id: i64) -> Result<Vec<Grade>> {
        let state = self.lock();
        if state.fail_grades {
            return Err(GradebookError::database_operation("grades table unavailable"));
        }
        Ok(state
            .grades
            .iter()
            .filter(|g| g.class_id == class_id)
            .cloned()
            .collect())
    }

    async fn list_grades_with_pagination(
        &self,
        class_id: i64,
        query: GradeListQuery,
    ) -> Result<GradeListResponse> {
        let items: Vec<Grade> = self
            .lock()
            .grades
            .iter()
            .filter(|g| g.class_id == class_id)
            .filter(|g| query.student_id.is_none_or(|s| g.student_id == s))
            .filter(|g| query.task_id.is_none_or(|t| g.task_id == t))
            .cloned()
            .collect();
        let (skip, take, pagination) = page_info(query.page, query.size, items.len());
        Ok(GradeListResponse {
            items: items.into_iter().skip(skip).take(take).collect(),
            pagination,
        })
    }

    async fn upsert_grade(
        &self,
        class_id: i64,
        grader_id: i64,
        req: UpsertGradeRequest,
    ) -> Result<Grade> {
        let mut state = self.lock();
        let now = chrono::Utc::now();
        if let Some(grade) = state
            .grades
            .iter_mut()
            .find(|g| g.student_id == req.student_id && g.task_id == req.task_id)
        {
            grade.score = req.score;
            grade.comment = req.comment;
            grade.grader_id = Some(grader_id);
            grade.updated_at = now;
            return Ok(grade.clone());
        }
        let id = state.next_id();
        let grade = Grade {
            id,
            class_id,
            student_id: req.student_id,
            task_id: req.task_id,
            score: req.score,
            grader_id: Some(grader_id),
            comment: req.comment,
            updated_at: now,
        };
        state.grades.push(grade.clone());
        Ok(grade)
    }
}

pub struct TestContext {
    pub storage: Arc<MemoryStorage>,
    pub grading: GradingConfig,
}

impl TestContext {
    pub fn new() -> Self {
        setup();
        Self {
            storage: Arc::new(MemoryStorage::seeded()),
            grading: GradingConfig {
                class_scale: "simple".to_string(),
                report_scale: "plus_minus".to_string(),
                demo_fallback: false,
            },
        }
    }

    /// 成绩读取失败时使用演示数据
    pub fn with_demo_fallback(mut self) -> Self {
        self.grading.demo_fallback = true;
        self
    }

    pub fn grading_data(&self) -> web::Data<GradingConfig> {
        web::Data::new(self.grading.clone())
    }

    pub fn storage_data(&self) -> web::Data<Arc<dyn Storage>> {
        let storage: Arc<dyn Storage> = self.storage.clone();
        web::Data::new(storage)
    }

    pub fn cache_data(&self) -> web::Data<Arc<dyn ObjectCache>> {
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::new(1_000, 60));
        web::Data::new(cache)
    }

    pub fn start_time(&self) -> web::Data<AppStartTime> {
        web::Data::new(AppStartTime {
            start_datetime: chrono::Utc::now(),
        })
    }

    /// 周期 P1（权重 40）含两个任务，周期 P2（权重 60）含一个任务
    pub fn seed_gradebook(&self) -> Seed {
        let mut state = self.storage.lock();
        let now = chrono::Utc::now();
        let period = |id: i64, name: &str, weight: f64, sort_order: i32| Period {
            id,
            class_id: CLASS_ID,
            name: name.to_string(),
            weight,
            start_date: None,
            end_date: None,
            sort_order,
            created_at: now,
            updated_at: now,
        };
        state.periods.push(period(501, "Term 1", 40.0, 1));
        state.periods.push(period(502, "Term 2", 60.0, 2));
        let task = |id: i64, period_id: i64, max_points: f64| Task {
            id,
            class_id: CLASS_ID,
            period_id,
            category_id: None,
            title: format!("Task {id}"),
            max_points,
            weight: 1.0,
            due_date: None,
            created_at: now,
            updated_at: now,
        };
        state.tasks.push(task(601, 501, 20.0));
        state.tasks.push(task(602, 501, 10.0));
        state.tasks.push(task(603, 502, 50.0));
        drop(state);

        Seed {
            term1: 501,
            term2: 502,
            task_a: 601,
            task_b: 602,
            task_c: 603,
        }
    }
}

pub struct Seed {
    pub term1: i64,
    pub term2: i64,
    pub task_a: i64,
    pub task_b: i64,
    pub task_c: i64,
}

/// 构建与生产一致的 App
#[macro_export]
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::JsonConfig::default().error_handler(
                    rust_gradebook::utils::json_error_handler,
                ))
                .app_data(actix_web::web::QueryConfig::default().error_handler(
                    rust_gradebook::utils::query_error_handler,
                ))
                .app_data($ctx.storage_data())
                .app_data($ctx.cache_data())
                .app_data($ctx.start_time())
                .app_data($ctx.grading_data())
                .configure(rust_gradebook::routes::configure_system_routes)
                .configure(rust_gradebook::routes::configure_classes_routes),
        )
        .await
    };
}
