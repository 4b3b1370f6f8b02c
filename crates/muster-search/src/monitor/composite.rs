// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use muster_model::{pool::ModelPool, resource::Functionality};

/// A composite monitor that forwards every event to all of its monitors.
///
/// `search_command` returns the first termination request in insertion order.
#[derive(Default)]
pub struct CompositeMonitor<'a> {
    monitors: Vec<Box<dyn SearchMonitor + 'a>>,
}

impl std::fmt::Debug for CompositeMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self
            .monitors
            .iter()
            .map(|m| m.name())
            .collect::<Vec<&str>>()
            .join(", ");
        f.debug_struct("CompositeMonitor")
            .field("monitors", &names)
            .finish()
    }
}

impl<'a> CompositeMonitor<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn SearchMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a> FromIterator<Box<dyn SearchMonitor + 'a>> for CompositeMonitor<'a> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SearchMonitor + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl SearchMonitor for CompositeMonitor<'_> {
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_search(&mut self) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search();
        }
    }

    fn on_exit_search(&mut self) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search();
        }
    }

    fn on_step(&mut self) {
        for monitor in &mut self.monitors {
            monitor.on_step();
        }
    }

    fn on_support_found(&mut self, functionality: &Functionality, pool: &ModelPool) {
        for monitor in &mut self.monitors {
            monitor.on_support_found(functionality, pool);
        }
    }

    fn search_command(&self) -> SearchCommand {
        for monitor in &self.monitors {
            if let SearchCommand::Terminate(reason) = monitor.search_command() {
                return SearchCommand::Terminate(reason);
            }
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{interrupt::InterruptMonitor, no_op::NoOpMonitor};
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct CountingMonitor {
        steps: usize,
        supports: usize,
        entered: bool,
    }

    impl SearchMonitor for &mut CountingMonitor {
        fn name(&self) -> &str {
            "CountingMonitor"
        }
        fn on_enter_search(&mut self) {
            self.entered = true;
        }
        fn on_exit_search(&mut self) {}
        fn on_step(&mut self) {
            self.steps += 1;
        }
        fn on_support_found(&mut self, _functionality: &Functionality, _pool: &ModelPool) {
            self.supports += 1;
        }
        fn search_command(&self) -> SearchCommand {
            SearchCommand::Continue
        }
    }

    #[test]
    fn test_forwards_events() {
        let mut counter = CountingMonitor::default();
        {
            let mut composite = CompositeMonitor::new();
            composite.add_monitor(NoOpMonitor::new());
            composite.add_monitor(&mut counter);
            assert_eq!(composite.len(), 2);

            composite.on_enter_search();
            composite.on_step();
            composite.on_step();
            composite.on_support_found(&Functionality::new("F"), &ModelPool::new());
            composite.on_exit_search();
        }
        assert!(counter.entered);
        assert_eq!(counter.steps, 2);
        assert_eq!(counter.supports, 1);
    }

    #[test]
    fn test_first_termination_wins() {
        let flag = AtomicBool::new(false);
        let mut composite = CompositeMonitor::with_capacity(2);
        composite.add_monitor(NoOpMonitor::new());
        composite.add_monitor(InterruptMonitor::new(&flag));
        assert_eq!(composite.search_command(), SearchCommand::Continue);

        flag.store(true, Ordering::Relaxed);
        assert_eq!(
            composite.search_command(),
            SearchCommand::Terminate("Interrupt signal received".to_string())
        );
    }

    #[test]
    fn test_debug_lists_names() {
        let composite: CompositeMonitor = [Box::new(NoOpMonitor::new()) as Box<dyn SearchMonitor>]
            .into_iter()
            .collect();
        assert_eq!(
            format!("{:?}", composite),
            "CompositeMonitor { monitors: \"NoOpMonitor\" }"
        );
    }
}
