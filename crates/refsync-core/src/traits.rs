use crate::error::InconsistentReferenceError;
use std::collections::{LinkedList, VecDeque};

///
/// EntityLookup
///
/// Resolves an entity by its identifier. Implemented by every entity that is
/// the target of a relation; generated holder setters call through it.
///

pub trait EntityLookup<Id>: Sized {
    fn find_by_id(id: &Id) -> Option<Self>;
}

///
/// RefContainer
///
/// Ordered container usable on either side of a wrapped relation.
///

pub trait RefContainer<T>: FromIterator<T> {
    fn ref_iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a;

    fn ref_len(&self) -> usize;

    fn ref_is_empty(&self) -> bool {
        self.ref_len() == 0
    }
}

impl<T> RefContainer<T> for Vec<T> {
    fn ref_iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }

    fn ref_len(&self) -> usize {
        self.len()
    }
}

impl<T> RefContainer<T> for Box<[T]> {
    fn ref_iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }

    fn ref_len(&self) -> usize {
        self.len()
    }
}

impl<T> RefContainer<T> for VecDeque<T> {
    fn ref_iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }

    fn ref_len(&self) -> usize {
        self.len()
    }
}

impl<T> RefContainer<T> for LinkedList<T> {
    fn ref_iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }

    fn ref_len(&self) -> usize {
        self.len()
    }
}

///
/// ReferenceCheck
///
/// Reconciles every relation of an entity. Generated per class and run once
/// after each construction path.
///

pub trait ReferenceCheck {
    fn check_references(&mut self) -> Result<(), InconsistentReferenceError>;
}

/// Finish constructing `value` by running its reference check once.
pub fn construct<T: ReferenceCheck>(mut value: T) -> Result<T, InconsistentReferenceError> {
    value.check_references()?;

    Ok(value)
}
