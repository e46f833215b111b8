//! Latest-value combination of two independently changing inputs.

use tokio::sync::watch;

type Combinator<A, B, O> = Box<dyn Fn(&A, &B) -> O + Send + Sync>;

/// Two named input slots and one combinator.
///
/// Nothing is published until both slots hold a value; afterwards every
/// update to either slot republishes `combine(left, right)`. Subscribers
/// receive the latest combined value and unsubscribe by dropping their
/// receiver.
pub struct LatestCombiner<A, B, O> {
    left: Option<A>,
    right: Option<B>,
    combine: Combinator<A, B, O>,
    output: watch::Sender<Option<O>>,
}

impl<A, B, O> LatestCombiner<A, B, O>
where
    O: Clone,
{
    pub fn new(combine: impl Fn(&A, &B) -> O + Send + Sync + 'static) -> Self {
        let (output, _) = watch::channel(None);
        Self {
            left: None,
            right: None,
            combine: Box::new(combine),
            output,
        }
    }

    pub fn set_left(&mut self, value: A) -> Option<O> {
        self.left = Some(value);
        self.recompute()
    }

    pub fn set_right(&mut self, value: B) -> Option<O> {
        self.right = Some(value);
        self.recompute()
    }

    /// Latest combined value, `None` until both inputs are present.
    pub fn latest(&self) -> Option<O> {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<O>> {
        self.output.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.output.receiver_count()
    }

    fn recompute(&mut self) -> Option<O> {
        let (Some(left), Some(right)) = (&self.left, &self.right) else {
            return None;
        };
        let combined = (self.combine)(left, right);
        self.output.send_replace(Some(combined.clone()));
        Some(combined)
    }
}
