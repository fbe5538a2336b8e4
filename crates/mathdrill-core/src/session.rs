//! Practice session state.
//!
//! A [`Session`] owns an exercise set, draws exercises from a shuffled deck,
//! and keeps score as answers are submitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::grader::{Grader, Verdict};
use crate::model::{Exercise, ExerciseSet};

/// 64-bit linear congruential generator. Deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        (self.state >> 32) as u32
    }

    /// A value in `0..n`. `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        ((u64::from(self.next_u32()) * n as u64) >> 32) as usize
    }
}

/// A fresh seed for sessions that were not given one.
pub fn random_seed() -> u64 {
    uuid::Uuid::new_v4().as_u64_pair().0
}

/// Running score of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub correct: u32,
    pub incorrect: u32,
    /// Consecutive correct answers up to now.
    pub streak: u32,
    pub best_streak: u32,
    /// Ids of exercises answered incorrectly at least once, in first-miss order.
    pub incorrect_exercises: Vec<String>,
}

impl SessionStats {
    pub fn attempts(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Fraction of correct answers, `0.0` before the first answer.
    pub fn accuracy(&self) -> f64 {
        match self.attempts() {
            0 => 0.0,
            n => f64::from(self.correct) / f64::from(n),
        }
    }

    fn record(&mut self, exercise_id: &str, correct: bool) {
        if correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.incorrect += 1;
            self.streak = 0;
            if !self.incorrect_exercises.iter().any(|id| id == exercise_id) {
                self.incorrect_exercises.push(exercise_id.to_string());
            }
        }
    }
}

/// One graded answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub exercise_id: String,
    pub question: String,
    /// The answer as typed.
    pub answer: String,
    pub verdict: Verdict,
    pub answered_at: DateTime<Utc>,
}

/// An interactive practice session over one exercise set.
#[derive(Debug, Clone)]
pub struct Session {
    set: ExerciseSet,
    /// Indices into `set.exercises` not drawn yet in this round.
    deck: Vec<usize>,
    rng: Lcg,
    seed: u64,
    current: usize,
    answered: bool,
    stats: SessionStats,
    attempts: Vec<Attempt>,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Start a session and draw the first exercise. Without a seed one is
    /// picked at random.
    pub fn new(set: ExerciseSet, seed: Option<u64>) -> Result<Self, SessionError> {
        if set.exercises.is_empty() {
            return Err(SessionError::NoExercises);
        }
        let seed = seed.unwrap_or_else(random_seed);
        tracing::debug!(set = %set.id, seed, "starting session");

        let mut session = Self {
            set,
            deck: Vec::new(),
            rng: Lcg::new(seed),
            seed,
            current: 0,
            answered: false,
            stats: SessionStats::default(),
            attempts: Vec::new(),
            started_at: Utc::now(),
        };
        session.current = session.draw();
        Ok(session)
    }

    fn draw(&mut self) -> usize {
        if self.deck.is_empty() {
            self.deck = (0..self.set.exercises.len()).collect();
        }
        let pick = match self.deck.len() {
            1 => 0,
            n => self.rng.below(n),
        };
        self.deck.remove(pick)
    }

    /// The exercise currently on screen.
    pub fn current(&self) -> &Exercise {
        &self.set.exercises[self.current]
    }

    /// Whether the current exercise has been answered.
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    /// Grade `answer` against the current exercise and record the attempt.
    pub fn submit(&mut self, grader: &Grader, answer: &str) -> Result<Verdict, SessionError> {
        let exercise = &self.set.exercises[self.current];
        if self.answered {
            return Err(SessionError::AlreadySubmitted(exercise.id.clone()));
        }

        let verdict = grader.grade(exercise, answer);
        self.stats.record(&exercise.id, verdict.correct);
        self.attempts.push(Attempt {
            exercise_id: exercise.id.clone(),
            question: exercise.question.clone(),
            answer: answer.to_string(),
            verdict: verdict.clone(),
            answered_at: Utc::now(),
        });
        self.answered = true;

        Ok(verdict)
    }

    /// Move on to the next exercise, answered or not.
    pub fn next(&mut self) -> &Exercise {
        self.current = self.draw();
        self.answered = false;
        self.current()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn exercise_set(&self) -> &ExerciseSet {
        &self.set
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
