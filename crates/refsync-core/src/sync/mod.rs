//! Reference/holder synchronization invoked by generated accessors and by
//! the generated reference check.
//!
//! Single relations keep `Option<T>` on the entity side and `Option<Id>` on
//! the holder side. Wrapped relations keep one ordered container per side.

#[cfg(test)]
mod tests;

use crate::{
    error::InconsistentReferenceError,
    model::RelationModel,
    traits::{EntityLookup, RefContainer},
};
use std::fmt::Debug;
use tracing::{debug, warn};

///
/// SINGLE
///

/// Store `value` on the entity side and copy its identifier to the holder.
pub fn set_entity<T, Id>(
    relation: &RelationModel,
    entity: &mut Option<T>,
    holder: &mut Option<Id>,
    value: Option<T>,
    id_of: impl Fn(&T) -> Option<Id>,
) {
    debug!(class = relation.class, field = relation.field, "set entity side");

    *holder = value.as_ref().and_then(id_of);
    *entity = value;
}

/// Store `value` on the holder side and resolve the entity it names.
pub fn set_holder<T, Id>(
    relation: &RelationModel,
    entity: &mut Option<T>,
    holder: &mut Option<Id>,
    value: Option<Id>,
) where
    T: EntityLookup<Id>,
    Id: Debug,
{
    debug!(class = relation.class, field = relation.holder, "set holder side");

    *entity = value.as_ref().and_then(|id| lookup(relation, id));
    *holder = value;
}

/// Reconcile a single relation.
///
/// An unset side is derived from the other one; two set sides must agree.
pub fn validate_single<T, Id>(
    relation: &RelationModel,
    entity: &mut Option<T>,
    holder: &mut Option<Id>,
    id_of: impl Fn(&T) -> Option<Id>,
) -> Result<(), InconsistentReferenceError>
where
    T: EntityLookup<Id>,
    Id: Debug + PartialEq,
{
    match (entity.as_ref(), holder.as_ref()) {
        (None, None) => {}
        (None, Some(id)) => *entity = lookup(relation, id),
        (Some(item), None) => *holder = id_of(item),
        (Some(item), Some(id)) => {
            let entity_id = id_of(item);
            if entity_id.as_ref() != Some(id) {
                return Err(inconsistent(relation, &entity_id, id));
            }
        }
    }

    Ok(())
}

///
/// WRAPPED
///

/// Store `value` on the entity side and rebuild the holder from its ids.
///
/// Elements without an identifier contribute nothing to the holder.
pub fn set_entities<C, H, T, Id>(
    relation: &RelationModel,
    entities: &mut Option<C>,
    holders: &mut Option<H>,
    value: Option<C>,
    id_of: impl Fn(&T) -> Option<Id>,
) where
    C: RefContainer<T>,
    H: RefContainer<Id>,
{
    debug!(class = relation.class, field = relation.field, "set entity side");

    *holders = value.as_ref().map(|items| collect_ids(items, &id_of));
    *entities = value;
}

/// Store `value` on the holder side and rebuild the entity side by lookup.
pub fn set_holders<C, H, T, Id>(
    relation: &RelationModel,
    entities: &mut Option<C>,
    holders: &mut Option<H>,
    value: Option<H>,
) where
    C: RefContainer<T>,
    H: RefContainer<Id>,
    T: EntityLookup<Id>,
    Id: Debug,
{
    debug!(class = relation.class, field = relation.holder, "set holder side");

    *entities = value.as_ref().map(|ids| lookup_all::<C, H, T, Id>(relation, ids));
    *holders = value;
}

/// Reconcile a wrapped relation.
///
/// A side counts as set when it is present and non-empty. Two set sides must
/// hold the same identifiers in the same order, except that holder ids which
/// resolve to no entity have no entity counterpart.
pub fn validate_many<C, H, T, Id>(
    relation: &RelationModel,
    entities: &mut Option<C>,
    holders: &mut Option<H>,
    id_of: impl Fn(&T) -> Option<Id>,
) -> Result<(), InconsistentReferenceError>
where
    C: RefContainer<T>,
    H: RefContainer<Id>,
    T: EntityLookup<Id>,
    Id: Debug + PartialEq,
{
    let entity_set = entities.as_ref().is_some_and(|c| !c.ref_is_empty());
    let holder_set = holders.as_ref().is_some_and(|c| !c.ref_is_empty());

    match (entities.as_ref(), holders.as_ref()) {
        (Some(items), Some(ids)) if entity_set && holder_set => {
            let entity_ids = items.ref_iter().map(&id_of).collect::<Vec<_>>();

            if !agrees::<T, Id>(&entity_ids, ids.ref_iter()) {
                let holder_ids = ids.ref_iter().collect::<Vec<_>>();
                return Err(inconsistent(relation, &entity_ids, &holder_ids));
            }
        }
        (Some(items), _) if entity_set => *holders = Some(collect_ids(items, &id_of)),
        (_, Some(ids)) if holder_set => {
            *entities = Some(lookup_all::<C, H, T, Id>(relation, ids));
        }
        _ => {}
    }

    Ok(())
}

/// Give an unset wrapped holder its empty container.
pub fn init_holder<H: Default>(holder: &mut Option<H>) {
    if holder.is_none() {
        *holder = Some(H::default());
    }
}

///
/// HELPERS
///

fn lookup<T, Id>(relation: &RelationModel, id: &Id) -> Option<T>
where
    T: EntityLookup<Id>,
    Id: Debug,
{
    let found = T::find_by_id(id);
    if found.is_none() {
        warn!(
            class = relation.class,
            field = relation.field,
            target = relation.target,
            id = ?id,
            "referenced entity not found"
        );
    }

    found
}

fn lookup_all<C, H, T, Id>(relation: &RelationModel, ids: &H) -> C
where
    C: RefContainer<T>,
    H: RefContainer<Id>,
    T: EntityLookup<Id>,
    Id: Debug,
{
    ids.ref_iter().filter_map(|id| lookup(relation, id)).collect()
}

// Holder ids that resolve to no entity are the ones a holder-side write
// dropped from the entity side, so they may be skipped. Every other id must
// pair with the next entity in order.
fn agrees<'a, T, Id>(entity_ids: &[Option<Id>], ids: impl Iterator<Item = &'a Id>) -> bool
where
    T: EntityLookup<Id>,
    Id: PartialEq + 'a,
{
    let mut pending = entity_ids.iter().peekable();

    for id in ids {
        if pending.next_if(|entity_id| entity_id.as_ref() == Some(id)).is_none()
            && T::find_by_id(id).is_some()
        {
            return false;
        }
    }

    pending.peek().is_none()
}

fn collect_ids<C, H, T, Id>(items: &C, id_of: impl Fn(&T) -> Option<Id>) -> H
where
    C: RefContainer<T>,
    H: RefContainer<Id>,
{
    items.ref_iter().filter_map(id_of).collect()
}

fn inconsistent(
    relation: &RelationModel,
    entity_ids: &impl Debug,
    holder_ids: &impl Debug,
) -> InconsistentReferenceError {
    InconsistentReferenceError {
        class: relation.class,
        field: relation.field,
        holder: relation.holder,
        entity_ids: format!("{entity_ids:?}"),
        holder_ids: format!("{holder_ids:?}"),
    }
}
