//! Typed merge combinators.
//!
//! A merge emits exactly once per source broadcast: the tuple slot of the
//! source that fired carries the just-emitted value, every other slot
//! carries that source's last-value snapshot (`None` when the source never
//! emitted). One slot per participating source, always.
//!
//! Sources are held strongly by the merge subscriptions, so a merge graph
//! lives for the life of the program; channel graphs here are built once
//! per widget and never torn down.

use crate::observable::Observable;

pub fn merge2<A, B>(a: &Observable<A>, b: &Observable<B>) -> Observable<(Option<A>, Option<B>)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let out = Observable::new("merge2");
    {
        let (out, b) = (out.clone(), b.clone());
        a.subscribe(move |v, _| out.broadcast((Some(v.clone()), b.last_value())));
    }
    {
        let (out, a) = (out.clone(), a.clone());
        b.subscribe(move |v, _| out.broadcast((a.last_value(), Some(v.clone()))));
    }
    out
}

pub fn merge3<A, B, C>(
    a: &Observable<A>,
    b: &Observable<B>,
    c: &Observable<C>,
) -> Observable<(Option<A>, Option<B>, Option<C>)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    let out = Observable::new("merge3");
    {
        let (out, b, c) = (out.clone(), b.clone(), c.clone());
        a.subscribe(move |v, _| out.broadcast((Some(v.clone()), b.last_value(), c.last_value())));
    }
    {
        let (out, a, c) = (out.clone(), a.clone(), c.clone());
        b.subscribe(move |v, _| out.broadcast((a.last_value(), Some(v.clone()), c.last_value())));
    }
    {
        let (out, a, b) = (out.clone(), a.clone(), b.clone());
        c.subscribe(move |v, _| out.broadcast((a.last_value(), b.last_value(), Some(v.clone()))));
    }
    out
}

#[allow(clippy::type_complexity)]
pub fn merge4<A, B, C, D>(
    a: &Observable<A>,
    b: &Observable<B>,
    c: &Observable<C>,
    d: &Observable<D>,
) -> Observable<(Option<A>, Option<B>, Option<C>, Option<D>)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
{
    let out = Observable::new("merge4");
    {
        let (out, b, c, d) = (out.clone(), b.clone(), c.clone(), d.clone());
        a.subscribe(move |v, _| {
            out.broadcast((Some(v.clone()), b.last_value(), c.last_value(), d.last_value()))
        });
    }
    {
        let (out, a, c, d) = (out.clone(), a.clone(), c.clone(), d.clone());
        b.subscribe(move |v, _| {
            out.broadcast((a.last_value(), Some(v.clone()), c.last_value(), d.last_value()))
        });
    }
    {
        let (out, a, b, d) = (out.clone(), a.clone(), b.clone(), d.clone());
        c.subscribe(move |v, _| {
            out.broadcast((a.last_value(), b.last_value(), Some(v.clone()), d.last_value()))
        });
    }
    {
        let (out, a, b, c) = (out.clone(), a.clone(), b.clone(), c.clone());
        d.subscribe(move |v, _| {
            out.broadcast((a.last_value(), b.last_value(), c.last_value(), Some(v.clone())))
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn merge_snapshots_silent_sources_as_none() {
        let a = Observable::new("a");
        let b: Observable<&'static str> = Observable::new("b");
        let merged = merge2(&a, &b);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        merged.subscribe(move |v, _| sink.borrow_mut().push(v.clone()));

        a.broadcast(1u32);
        assert_eq!(*seen.borrow(), vec![(Some(1), None)]);
    }

    #[test]
    fn merge_carries_last_values_of_other_sources() {
        let a = Observable::new("a");
        let b = Observable::new("b");
        let c = Observable::new("c");
        let merged = merge3(&a, &b, &c);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        merged.subscribe(move |v, _| sink.borrow_mut().push(v.clone()));

        a.broadcast(1u32);
        b.broadcast("hi");
        c.broadcast(2.5f64);
        a.broadcast(2);

        assert_eq!(
            *seen.borrow(),
            vec![
                (Some(1), None, None),
                (Some(1), Some("hi"), None),
                (Some(1), Some("hi"), Some(2.5)),
                (Some(2), Some("hi"), Some(2.5)),
            ]
        );
    }

    #[test]
    fn each_source_broadcast_fires_the_merge_exactly_once() {
        let a = Observable::new("a");
        let b = Observable::new("b");
        let merged = merge2(&a, &b);
        let count = Rc::new(RefCell::new(0u32));
        let sink = count.clone();
        merged.subscribe(move |_: &(Option<u32>, Option<u32>), _| *sink.borrow_mut() += 1);

        a.broadcast(1);
        b.broadcast(2);
        b.broadcast(3);
        assert_eq!(*count.borrow(), 3);
    }

    #[test]
    fn transient_source_contributes_none_between_events() {
        let clicks = Observable::new_transient("clicks");
        let data = Observable::new("data");
        let merged = merge2(&data, &clicks);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        merged.subscribe(move |v, _| sink.borrow_mut().push(v.clone()));

        clicks.broadcast(9u32);
        data.broadcast(1u32);
        assert_eq!(
            *seen.borrow(),
            vec![(None, Some(9)), (Some(1), None)],
            "the click must not leak into the later data emission"
        );
    }

    #[test]
    fn merge4_always_has_one_slot_per_source() {
        let a = Observable::new("a");
        let b = Observable::new("b");
        let c = Observable::new("c");
        let d = Observable::new("d");
        let merged = merge4(&a, &b, &c, &d);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        merged.subscribe(move |v, _| sink.borrow_mut().push(v.clone()));

        d.broadcast(true);
        assert_eq!(
            *seen.borrow(),
            vec![(None::<u8>, None::<u8>, None::<u8>, Some(true))]
        );
    }
}
