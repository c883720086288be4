use std::collections::BTreeMap;
use std::time::Duration;

use super::entities::Side;

/// Identity of one round. Tasks stamped with an older token never fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct RoundToken(u64);

impl RoundToken {
    pub(crate) fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct TaskId(u64);

/// Deferred work, interpreted by the session when it comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerAction {
    CountdownTick,
    SpawnApple,
    ActivateMonkey,
    MonkeyThrow(Side),
    MonkeyTaunt(Side),
    MonkeyHide(Side),
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTask {
    id: TaskId,
    period: Option<Duration>,
    action: TimerAction,
    round: RoundToken,
}

/// Ordered queue of one-shot and periodic tasks on a simulation clock.
///
/// The clock only moves through [`TimerRegistry::pop_due`] and
/// [`TimerRegistry::settle_at`], so a suspended registry loses no time and
/// fires nothing late.
#[derive(Debug, Default)]
pub(crate) struct TimerRegistry {
    now: Duration,
    next_task_id: u64,
    current_round: RoundToken,
    suspended: bool,
    tasks: BTreeMap<(Duration, TaskId), ScheduledTask>,
}

impl TimerRegistry {
    /// Drops every task of the previous round and issues a fresh token.
    pub(crate) fn begin_round(&mut self) -> RoundToken {
        self.current_round = RoundToken(self.current_round.0 + 1);
        let current = self.current_round;
        self.tasks.retain(|_, task| task.round == current);
        self.suspended = false;
        current
    }

    pub(crate) fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn schedule_once(&mut self, delay: Duration, action: TimerAction) -> TaskId {
        self.insert(self.now + delay, None, action)
    }

    /// First fire after one full period. A zero period is bumped to 1 ms.
    pub(crate) fn schedule_every(&mut self, period: Duration, action: TimerAction) -> TaskId {
        let period = period.max(Duration::from_millis(1));
        self.insert(self.now + period, Some(period), action)
    }

    fn insert(&mut self, due: Duration, period: Option<Duration>, action: TimerAction) -> TaskId {
        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;
        self.tasks.insert(
            (due, id),
            ScheduledTask {
                id,
                period,
                action,
                round: self.current_round,
            },
        );
        id
    }

    pub(crate) fn cancel_all(&mut self) -> usize {
        let cancelled = self.tasks.len();
        self.tasks.clear();
        cancelled
    }

    #[cfg(test)]
    pub(crate) fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    pub(crate) fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    /// Pops the earliest task due at or before `deadline` and moves the clock
    /// to its due time. Periodic tasks are re-armed one period later.
    pub(crate) fn pop_due(&mut self, deadline: Duration) -> Option<TimerAction> {
        if self.suspended {
            return None;
        }
        loop {
            let (&(due, _), _) = self.tasks.iter().next()?;
            if due > deadline {
                return None;
            }
            let (_, task) = self.tasks.pop_first()?;
            if task.round != self.current_round {
                continue;
            }
            self.now = self.now.max(due);
            if let Some(period) = task.period {
                self.tasks.insert((due + period, task.id), task);
            }
            return Some(task.action);
        }
    }

    /// Moves the clock to `deadline` once every due task has been popped.
    pub(crate) fn settle_at(&mut self, deadline: Duration) {
        if !self.suspended {
            self.now = self.now.max(deadline);
        }
    }

    #[cfg(test)]
    pub(crate) fn drain_until(&mut self, deadline: Duration) -> Vec<TimerAction> {
        let mut fired = Vec::new();
        while let Some(action) = self.pop_due(deadline) {
            fired.push(action);
        }
        self.settle_at(deadline);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn periodic_task_fires_once_per_period() {
        let mut timers = TimerRegistry::default();
        timers.begin_round();
        timers.schedule_every(ms(1_000), TimerAction::CountdownTick);

        assert!(timers.drain_until(ms(999)).is_empty());
        assert_eq!(timers.drain_until(ms(1_000)), vec![TimerAction::CountdownTick]);
        assert_eq!(timers.drain_until(ms(3_500)).len(), 2);
        assert_eq!(timers.pending_count(), 1);
    }

    #[test]
    fn tasks_fire_in_due_order_with_ties_in_schedule_order() {
        let mut timers = TimerRegistry::default();
        timers.begin_round();
        timers.schedule_once(ms(300), TimerAction::MonkeyHide(Side::Left));
        timers.schedule_once(ms(100), TimerAction::MonkeyThrow(Side::Left));
        timers.schedule_once(ms(100), TimerAction::SpawnApple);

        assert_eq!(
            timers.drain_until(ms(1_000)),
            vec![
                TimerAction::MonkeyThrow(Side::Left),
                TimerAction::SpawnApple,
                TimerAction::MonkeyHide(Side::Left),
            ]
        );
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn clock_sits_at_the_firing_time_while_draining() {
        let mut timers = TimerRegistry::default();
        timers.begin_round();
        timers.schedule_once(ms(250), TimerAction::ActivateMonkey);

        assert_eq!(timers.pop_due(ms(1_000)), Some(TimerAction::ActivateMonkey));
        assert_eq!(timers.now(), ms(250));
        timers.schedule_once(ms(100), TimerAction::MonkeyThrow(Side::Right));
        assert_eq!(
            timers.pop_due(ms(1_000)),
            Some(TimerAction::MonkeyThrow(Side::Right))
        );
        assert_eq!(timers.now(), ms(350));
        timers.settle_at(ms(1_000));
        assert_eq!(timers.now(), ms(1_000));
    }

    #[test]
    fn previous_round_tasks_never_fire() {
        let mut timers = TimerRegistry::default();
        let first = timers.begin_round();
        timers.schedule_once(ms(500), TimerAction::MonkeyThrow(Side::Left));
        timers.schedule_every(ms(200), TimerAction::SpawnApple);

        let second = timers.begin_round();
        assert_ne!(first, second);
        assert_eq!(timers.pending_count(), 0);
        timers.schedule_once(ms(600), TimerAction::CountdownTick);

        assert_eq!(timers.drain_until(ms(1_000)), vec![TimerAction::CountdownTick]);
    }

    #[test]
    fn suspended_registry_freezes_clock_and_tasks() {
        let mut timers = TimerRegistry::default();
        timers.begin_round();
        timers.schedule_every(ms(1_000), TimerAction::CountdownTick);
        timers.drain_until(ms(600));

        timers.set_suspended(true);
        assert!(timers.drain_until(ms(5_000)).is_empty());
        assert_eq!(timers.now(), ms(600));

        timers.set_suspended(false);
        assert!(timers.drain_until(ms(999)).is_empty());
        assert_eq!(timers.drain_until(ms(1_000)), vec![TimerAction::CountdownTick]);
    }

    #[test]
    fn cancel_all_clears_every_pending_task() {
        let mut timers = TimerRegistry::default();
        timers.begin_round();
        timers.schedule_once(ms(100), TimerAction::MonkeyThrow(Side::Left));
        timers.schedule_once(ms(200), TimerAction::MonkeyTaunt(Side::Left));
        timers.schedule_every(ms(50), TimerAction::SpawnApple);

        assert_eq!(timers.cancel_all(), 3);
        assert_eq!(timers.pending_count(), 0);
        assert!(timers.drain_until(ms(10_000)).is_empty());
    }
}
