/// A fixed set of items viewed through a wrapping cursor. Advancing past
/// the last item comes back around to the first, and stepping back from
/// the first wraps to the last, so the strip has no dead ends.
#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> Carousel<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    /// Advance by `steps`, wrapping at the end.
    pub fn advance(&mut self, steps: usize) {
        if self.items.is_empty() {
            return;
        }
        self.cursor = (self.cursor + steps) % self.items.len();
    }

    /// Step back by `steps`, wrapping at the front.
    pub fn retreat(&mut self, steps: usize) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len();
        self.cursor = (self.cursor + len - (steps % len)) % len;
    }

    /// The run of items starting at the cursor, wrapping around. At most
    /// `size` long and never repeating an item.
    pub fn window(&self, size: usize) -> Vec<&T> {
        let take = size.min(self.items.len());
        (0..take)
            .map(|offset| &self.items[(self.cursor + offset) % self.items.len()])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel() -> Carousel<u32> {
        Carousel::new(vec![10, 20, 30, 40, 50])
    }

    #[test]
    fn advancing_past_the_end_wraps() {
        let mut strip = carousel();
        strip.advance(4);
        assert_eq!(strip.current(), Some(&50));
        strip.advance(1);
        assert_eq!(strip.current(), Some(&10));
        strip.advance(7);
        assert_eq!(strip.current(), Some(&30));
    }

    #[test]
    fn retreating_from_the_front_wraps() {
        let mut strip = carousel();
        strip.retreat(1);
        assert_eq!(strip.current(), Some(&50));
        strip.retreat(6);
        assert_eq!(strip.current(), Some(&40));
    }

    #[test]
    fn window_wraps_without_repeating() {
        let mut strip = carousel();
        strip.advance(3);
        assert_eq!(strip.window(3), vec![&40, &50, &10]);
        assert_eq!(strip.window(9), vec![&40, &50, &10, &20, &30]);
    }

    #[test]
    fn empty_carousel_is_inert() {
        let mut strip: Carousel<u32> = Carousel::new(Vec::new());
        strip.advance(3);
        strip.retreat(2);
        assert_eq!(strip.current(), None);
        assert!(strip.window(4).is_empty());
    }
}
