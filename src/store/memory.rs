// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::DashboardStore;
use crate::{
    error::AppError,
    models::{
        attempt::{AttemptStatus, QuizAttempt},
        dashboard::{AttemptLeader, PassedLeader, StudentAttemptRecord, StudentSummary},
        quiz::Quiz,
        student::Student,
    },
};

/// In-process store over a fixed data set.
///
/// Mirrors the SQL of [`super::PgDashboardStore`]: inner joins (attempts with
/// an unknown student or quiz are invisible), null-skipping averages, same
/// orderings and limits. Usernames compare bytewise, which is what the SQL's
/// `COLLATE "C"` does too.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    students: HashMap<i64, Student>,
    quizzes: HashMap<i64, Quiz>,
    attempts: Vec<QuizAttempt>,
}

impl MemoryStore {
    pub fn new(students: Vec<Student>, quizzes: Vec<Quiz>, attempts: Vec<QuizAttempt>) -> Self {
        Self {
            students: students.into_iter().map(|s| (s.id, s)).collect(),
            quizzes: quizzes.into_iter().map(|q| (q.id, q)).collect(),
            attempts,
        }
    }

    /// Attempts joined with their student, grouped per student.
    fn grouped<'a>(
        &'a self,
        keep: impl Fn(&QuizAttempt) -> bool,
    ) -> Vec<(&'a Student, Vec<&'a QuizAttempt>)> {
        let mut groups: HashMap<i64, Vec<&QuizAttempt>> = HashMap::new();
        for attempt in self.attempts.iter().filter(|a| keep(a)) {
            if self.students.contains_key(&attempt.student_id) {
                groups.entry(attempt.student_id).or_default().push(attempt);
            }
        }

        groups
            .into_iter()
            .filter_map(|(id, attempts)| self.students.get(&id).map(|s| (s, attempts)))
            .collect()
    }

    /// Ranks `(student, count)` pairs: count desc, username asc, capped at `limit`.
    fn ranked(mut counts: Vec<(&Student, i64)>, limit: i64) -> Vec<(&Student, i64)> {
        counts.sort_by(|(sa, ca), (sb, cb)| cb.cmp(ca).then_with(|| sa.username.cmp(&sb.username)));
        counts.truncate(usize::try_from(limit).unwrap_or(0));
        counts
    }
}

fn average(scores: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    let (sum, n) = scores.fold((Decimal::ZERO, 0i64), |(sum, n), s| (sum + s, n + 1));
    (n > 0).then(|| sum / Decimal::from(n))
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn student_summaries(&self) -> Result<Vec<StudentSummary>, AppError> {
        let mut summaries: Vec<StudentSummary> = self
            .grouped(|_| true)
            .into_iter()
            .map(|(student, attempts)| StudentSummary {
                student_id: student.id,
                username: student.username.clone(),
                email: student.email.clone(),
                attempt_count: attempts.len() as i64,
                last_submitted_at: attempts.iter().filter_map(|a| a.submitted_at).max(),
                average_score: average(attempts.iter().filter_map(|a| a.score)),
            })
            .collect();

        summaries.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(summaries)
    }

    async fn attempts_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAttemptRecord>, AppError> {
        let mut records: Vec<StudentAttemptRecord> = self
            .attempts
            .iter()
            .filter(|a| a.student_id == student_id)
            .filter_map(|a| {
                let quiz = self.quizzes.get(&a.quiz_id)?;
                Some(StudentAttemptRecord {
                    attempt_id: a.id,
                    quiz_id: quiz.id,
                    quiz_title: quiz.title.clone(),
                    quiz_category: quiz.category,
                    started_at: a.started_at,
                    submitted_at: a.submitted_at,
                    status: a.status,
                    max_points: a.max_points,
                    earned_points: a.earned_points,
                    score: a.score,
                })
            })
            .collect();

        records.sort_by(|a, b| {
            b.started_at
                .cmp(&a.started_at)
                .then_with(|| b.attempt_id.cmp(&a.attempt_id))
        });
        Ok(records)
    }

    async fn top_by_attempts(&self, limit: i64) -> Result<Vec<AttemptLeader>, AppError> {
        let counts = self
            .grouped(|_| true)
            .into_iter()
            .map(|(student, attempts)| (student, attempts.len() as i64))
            .collect();

        Ok(Self::ranked(counts, limit)
            .into_iter()
            .map(|(student, count)| AttemptLeader {
                student_id: student.id,
                username: student.username.clone(),
                attempt_count: count,
            })
            .collect())
    }

    async fn top_by_passed(
        &self,
        status: AttemptStatus,
        min_score: Decimal,
        limit: i64,
    ) -> Result<Vec<PassedLeader>, AppError> {
        let counts = self
            .grouped(|a| a.status == status && a.score.is_some_and(|s| s >= min_score))
            .into_iter()
            .map(|(student, attempts)| (student, attempts.len() as i64))
            .collect();

        Ok(Self::ranked(counts, limit)
            .into_iter()
            .map(|(student, count)| PassedLeader {
                student_id: student.id,
                username: student.username.clone(),
                passed_count: count,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn student(id: i64, username: &str) -> Student {
        Student {
            id,
            username: username.to_string(),
            email: format!("{}@uni.edu", username),
        }
    }

    fn attempt(
        id: i64,
        student_id: i64,
        minutes: i64,
        status: AttemptStatus,
        score: Option<i64>,
    ) -> QuizAttempt {
        let started_at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes);
        QuizAttempt {
            id,
            student_id,
            quiz_id: 1,
            started_at,
            submitted_at: (status == AttemptStatus::Submitted).then(|| started_at + Duration::minutes(20)),
            status,
            max_points: Decimal::from(10),
            earned_points: Decimal::from(score.unwrap_or(0) / 10),
            score: score.map(Decimal::from),
        }
    }

    fn fixture() -> MemoryStore {
        let quiz = Quiz {
            id: 1,
            title: "Bayes".to_string(),
            category: 1,
        };
        MemoryStore::new(
            vec![
                student(1, "carla"),
                student(2, "andres"),
                student(3, "beto"),
                student(4, "diana"),
            ],
            vec![quiz],
            vec![
                attempt(1, 1, 0, AttemptStatus::Submitted, Some(90)),
                attempt(2, 1, 30, AttemptStatus::Submitted, Some(40)),
                attempt(3, 1, 60, AttemptStatus::InProgress, None),
                attempt(4, 2, 0, AttemptStatus::Submitted, Some(60)),
                attempt(5, 3, 10, AttemptStatus::InProgress, None),
                // orphan: student 99 does not exist
                attempt(6, 99, 0, AttemptStatus::Submitted, Some(100)),
            ],
        )
    }

    #[tokio::test]
    async fn summaries_skip_students_without_attempts() {
        let summaries = fixture().student_summaries().await.unwrap();
        let names: Vec<_> = summaries.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(names, ["andres", "beto", "carla"]);

        let carla = &summaries[2];
        assert_eq!(carla.attempt_count, 3);
        assert_eq!(carla.average_score, Some(Decimal::from(65)));
        assert_eq!(
            carla.last_submitted_at,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 8, 50, 0).unwrap())
        );

        let beto = &summaries[1];
        assert_eq!(beto.last_submitted_at, None);
        assert_eq!(beto.average_score, None);
    }

    #[tokio::test]
    async fn usernames_sort_bytewise() {
        let quiz = Quiz {
            id: 1,
            title: "Bayes".to_string(),
            category: 1,
        };
        let store = MemoryStore::new(
            vec![student(1, "beto"), student(2, "Zoe"), student(3, "_aux"), student(4, "ana")],
            vec![quiz],
            (1..=4)
                .map(|id| attempt(id, id, 0, AttemptStatus::Submitted, Some(80)))
                .collect(),
        );

        let summaries = store.student_summaries().await.unwrap();
        let names: Vec<_> = summaries.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(names, ["Zoe", "_aux", "ana", "beto"]);

        let top = store.top_by_attempts(10).await.unwrap();
        let names: Vec<_> = top.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["Zoe", "_aux", "ana", "beto"]);
    }

    #[tokio::test]
    async fn attempts_come_newest_first() {
        let store = fixture();
        let records = store.attempts_for_student(1).await.unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.attempt_id).collect();
        assert_eq!(ids, [3, 2, 1]);
        assert!(records.windows(2).all(|w| w[0].started_at > w[1].started_at));
        assert_eq!(records[0].quiz_title, "Bayes");

        assert!(store.attempts_for_student(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn attempt_leaderboard_breaks_ties_by_username() {
        let store = fixture();
        let top = store.top_by_attempts(10).await.unwrap();
        let ranking: Vec<_> = top.iter().map(|e| (e.username.as_str(), e.attempt_count)).collect();
        assert_eq!(ranking, [("carla", 3), ("andres", 1), ("beto", 1)]);

        assert_eq!(store.top_by_attempts(2).await.unwrap().len(), 2);
        assert!(store.top_by_attempts(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn passed_leaderboard_uses_inclusive_threshold() {
        let store = fixture();
        let top = store
            .top_by_passed(AttemptStatus::Submitted, Decimal::from(60), 10)
            .await
            .unwrap();
        let ranking: Vec<_> = top.iter().map(|e| (e.username.as_str(), e.passed_count)).collect();
        assert_eq!(ranking, [("andres", 1), ("carla", 1)]);

        let stricter = store
            .top_by_passed(AttemptStatus::Submitted, Decimal::new(6001, 2), 10)
            .await
            .unwrap();
        let ranking: Vec<_> = stricter.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(ranking, ["carla"]);
    }
}
