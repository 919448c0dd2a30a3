use proptest::prelude::*;

/// Roster mutation applied during property tests
#[derive(Debug, Clone)]
pub enum RosterOp {
    Enroll { activity: usize, student: usize },
    Withdraw { activity: usize, student: usize },
}

/// Student email from a small pool so collisions happen often
pub fn student_email(student: usize) -> String {
    format!("student{student}@mergington.edu")
}

/// Strategy for one mutation against `activities` activities and `students` students
pub fn roster_op_strategy(activities: usize, students: usize) -> impl Strategy<Value = RosterOp> {
    prop_oneof![
        3 => (0..activities, 0..students)
            .prop_map(|(activity, student)| RosterOp::Enroll { activity, student }),
        1 => (0..activities, 0..students)
            .prop_map(|(activity, student)| RosterOp::Withdraw { activity, student }),
    ]
}

/// Strategy for small capacities so activities fill up during a run
pub fn capacity_strategy() -> impl Strategy<Value = usize> {
    1usize..6
}
