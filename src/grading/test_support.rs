//! 测试用的构造函数

use chrono::Utc;

use crate::models::categories::entities::Category;
use crate::models::gradebook::entities::Student;
use crate::models::grades::entities::Grade;
use crate::models::periods::entities::Period;
use crate::models::tasks::entities::Task;

pub fn student(id: i64, name: &str) -> Student {
    Student {
        id,
        name: name.to_string(),
    }
}

pub fn period(id: i64, weight: f64, sort_order: i32) -> Period {
    Period {
        id,
        class_id: 1,
        name: format!("Period {id}"),
        weight,
        start_date: None,
        end_date: None,
        sort_order,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn category(id: i64, period_id: i64, weight: f64) -> Category {
    Category {
        id,
        class_id: 1,
        period_id,
        name: format!("Category {id}"),
        weight,
        created_at: Utc::now(),
    }
}

pub fn task(id: i64, period_id: i64, max_points: f64, weight: f64) -> Task {
    Task {
        id,
        class_id: 1,
        period_id,
        category_id: None,
        title: format!("Task {id}"),
        max_points,
        weight,
        due_date: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn categorized(mut task: Task, category_id: i64) -> Task {
    task.category_id = Some(category_id);
    task
}

pub fn grade(id: i64, student_id: i64, task_id: i64, score: Option<f64>) -> Grade {
    Grade {
        id,
        class_id: 1,
        student_id,
        task_id,
        score,
        grader_id: None,
        comment: None,
        updated_at: Utc::now(),
    }
}
