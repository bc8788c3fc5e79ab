use rand::Rng;

use crate::models::gradebook::entities::Student;
use crate::models::grades::entities::Grade;
use crate::models::tasks::entities::Task;

/// 生成演示用的随机成绩
///
/// 约 15% 的成绩留空，其余在满分的 50%~100% 之间，按 0.5 分取整。
/// 生成的成绩 id 为负数，不会与真实数据混淆。
pub fn demo_grades<R: Rng>(
    class_id: i64,
    roster: &[Student],
    tasks: &[Task],
    rng: &mut R,
) -> Vec<Grade> {
    let now = chrono::Utc::now();
    let mut grades = Vec::with_capacity(roster.len() * tasks.len());

    for student in roster {
        for task in tasks {
            let score = if task.max_points > 0.0 && rng.random_bool(0.85) {
                let raw = rng.random_range(0.5..=1.0) * task.max_points;
                Some((raw * 2.0).round() / 2.0)
            } else {
                None
            };
            grades.push(Grade {
                id: -(grades.len() as i64) - 1,
                class_id,
                student_id: student.id,
                task_id: task.id,
                score,
                grader_id: None,
                comment: None,
                updated_at: now,
            });
        }
    }

    grades
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::test_support::{student, task};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_demo_grades_cover_roster() {
        let roster = vec![student(1, "Ann"), student(2, "Ben")];
        let tasks = vec![task(10, 1, 20.0, 1.0), task(11, 1, 0.0, 1.0)];
        let mut rng = StdRng::seed_from_u64(42);

        let grades = demo_grades(3, &roster, &tasks, &mut rng);

        assert_eq!(grades.len(), 4);
        assert!(grades.iter().all(|g| g.id < 0 && g.class_id == 3));
        for g in &grades {
            if g.task_id == 11 {
                assert_eq!(g.score, None);
            }
            if let Some(score) = g.score {
                assert!((10.0..=20.0).contains(&score));
            }
        }
    }
}
