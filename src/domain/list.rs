//! Ordered annotation container shared by commands, selection and rendering
//!
//! Insertion order is z-order: later entries draw on top and win hit tests.

use super::annotation::{Annotation, AnnotationId, AnnotationKind};

#[derive(Debug, Clone)]
pub struct AnnotationList {
    items: Vec<Annotation>,
    next_step: u32,
}

impl Default for AnnotationList {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationList {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_step: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Annotation> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.items
    }

    pub fn position(&self, id: AnnotationId) -> Option<usize> {
        self.items.iter().position(|a| a.id() == id)
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.items.iter().find(|a| a.id() == id)
    }

    pub fn get_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.items.iter_mut().find(|a| a.id() == id)
    }

    /// Append on top of the z-order
    pub fn push(&mut self, annotation: Annotation) {
        self.items.push(annotation);
    }

    /// Insert at `index`, or append when the index is past the end
    pub fn insert(&mut self, index: usize, annotation: Annotation) {
        if index <= self.items.len() {
            self.items.insert(index, annotation);
        } else {
            self.items.push(annotation);
        }
    }

    /// Remove by identity, returning the former index and value
    pub fn remove(&mut self, id: AnnotationId) -> Option<(usize, Annotation)> {
        let index = self.position(id)?;
        Some((index, self.items.remove(index)))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.next_step = 1;
    }

    /// Swap in a fully transformed sequence in one step
    pub fn replace(&mut self, items: Vec<Annotation>) {
        self.items = items;
    }

    pub fn to_vec(&self) -> Vec<Annotation> {
        self.items.clone()
    }

    pub fn clear_selection(&mut self) {
        for a in &mut self.items {
            a.selected = false;
        }
    }

    pub fn step_count(&self) -> usize {
        self.items.iter().filter(|a| a.is_step()).count()
    }

    /// Number the next Step marker receives
    pub fn next_step_number(&self) -> u32 {
        self.next_step
    }

    /// Hand out the next Step number and advance the counter
    pub fn take_step_number(&mut self) -> u32 {
        let number = self.next_step;
        self.next_step += 1;
        number
    }

    /// Renumber Step markers densely from 1, keeping their relative order.
    ///
    /// Afterwards the next step number is `count + 1`.
    pub fn renumber_steps(&mut self) {
        let mut steps: Vec<(u32, usize)> = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(i, a)| match &a.kind {
                AnnotationKind::Step(s) => Some((s.number, i)),
                _ => None,
            })
            .collect();
        // Stable: equal numbers keep sequence order
        steps.sort_by_key(|(number, _)| *number);

        for (n, (_, index)) in steps.iter().enumerate() {
            if let AnnotationKind::Step(s) = &mut self.items[*index].kind {
                s.number = n as u32 + 1;
            }
        }
        self.next_step = steps.len() as u32 + 1;
    }
}

impl<'a> IntoIterator for &'a AnnotationList {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::annotation::{RectangleAnnotation, StepAnnotation, StrokeStyle};
    use crate::domain::geometry::{Point, Rect};

    fn step(number: u32) -> Annotation {
        Annotation::new(
            AnnotationKind::Step(StepAnnotation {
                position: Point::new(number as f32 * 10.0, 0.0),
                number,
                size: 32.0,
            }),
            StrokeStyle::default(),
        )
    }

    fn numbers(list: &AnnotationList) -> Vec<u32> {
        list.iter()
            .filter_map(|a| match &a.kind {
                AnnotationKind::Step(s) => Some(s.number),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_renumber_after_gap() {
        let mut list = AnnotationList::new();
        list.push(step(1));
        list.push(Annotation::new(
            AnnotationKind::Rectangle(RectangleAnnotation {
                bounds: Rect::new(0.0, 0.0, 5.0, 5.0),
            }),
            StrokeStyle::default(),
        ));
        list.push(step(3));
        list.push(step(7));

        list.renumber_steps();
        assert_eq!(numbers(&list), vec![1, 2, 3]);
        assert_eq!(list.next_step_number(), 4);
    }

    #[test]
    fn test_renumber_orders_by_existing_number() {
        let mut list = AnnotationList::new();
        list.push(step(3));
        list.push(step(1));
        list.renumber_steps();
        assert_eq!(numbers(&list), vec![2, 1]);
    }

    #[test]
    fn test_renumber_without_steps_resets_counter() {
        let mut list = AnnotationList::new();
        list.push(step(5));
        let id = list.iter().next().unwrap().id();
        list.remove(id);
        list.renumber_steps();
        assert_eq!(list.next_step_number(), 1);
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut list = AnnotationList::new();
        list.push(step(1));
        let extra = step(2);
        let id = extra.id();
        list.insert(10, extra);
        assert_eq!(list.position(id), Some(1));
    }

    #[test]
    fn test_remove_returns_index() {
        let mut list = AnnotationList::new();
        let a = step(1);
        let b = step(2);
        let b_id = b.id();
        list.push(a);
        list.push(b);
        let (index, removed) = list.remove(b_id).unwrap();
        assert_eq!(index, 1);
        assert_eq!(removed.id(), b_id);
        assert!(list.remove(b_id).is_none());
    }
}
