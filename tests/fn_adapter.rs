use std::cell::RefCell;
use std::rc::Rc;

use kvc::{
    Container, ContainerFn, Context, Deleter, Error, Getter, MapContainer, Modifier, Putter,
    PutterFn, Result,
};

type Shared = Rc<RefCell<MapContainer<i32, i32>>>;

fn adapter_over(shared: &Shared) -> ContainerFn<i32, i32> {
    let put = shared.clone();
    let get = shared.clone();
    let modify = shared.clone();
    let del = shared.clone();
    let len = shared.clone();
    let cap = shared.clone();

    ContainerFn::new()
        .with_put(move |ctx: &Context, key, val| put.borrow_mut().put(ctx, key, val))
        .with_get(move |ctx: &Context, key| get.borrow().get(ctx, key))
        .with_modify(move |ctx: &Context, key, f| modify.borrow_mut().modify(ctx, key, f))
        .with_del(move |ctx: &Context, key| del.borrow_mut().del(ctx, key))
        .with_len(move |ctx: &Context| len.borrow().len(ctx))
        .with_cap(move |ctx: &Context| cap.borrow().cap(ctx))
}

// Results come back from the held functions unchanged
#[test]
fn adapter_matches_backing_container() -> Result<()> {
    let ctx = Context::background();
    let shared = Rc::new(RefCell::new(MapContainer::new()));
    let mut c = adapter_over(&shared);

    c.put(&ctx, 1, 1)?;
    assert_eq!(c.get(&ctx, 1), Ok(1));
    assert_eq!(c.del(&ctx, 1), Ok(1));
    assert_eq!(c.get(&ctx, 1), Err(Error::Get));
    assert_eq!(c.del(&ctx, 1), Err(Error::Del));
    assert_eq!(c.modify(&ctx, 2, Some(&|v| v + 1)), Err(Error::Mod));
    assert_eq!(c.get(&ctx, 2), Ok(1));
    assert_eq!(c.modify(&ctx, 2, None), Ok(()));
    assert_eq!(c.len(&ctx), Ok(1));
    assert_eq!(c.cap(&ctx), Ok(2));

    assert_eq!(shared.borrow().get(&ctx, 2), Ok(1));

    Ok(())
}

// Unset slots fail on their own and leave the backing container alone
#[test]
fn unset_slots_have_no_side_effect() -> Result<()> {
    let ctx = Context::background();
    let shared: Shared = Rc::new(RefCell::new(MapContainer::new()));
    let reader = shared.clone();
    let mut c = ContainerFn::<i32, i32>::new()
        .with_get(move |ctx: &Context, key| reader.borrow().get(ctx, key));

    assert_eq!(c.put(&ctx, 1, 1), Err(Error::Unimplemented));
    assert_eq!(c.modify(&ctx, 1, Some(&|v| v + 1)), Err(Error::Unimplemented));
    assert_eq!(c.del(&ctx, 1), Err(Error::Unimplemented));
    assert_eq!(c.len(&ctx), Err(Error::Unimplemented));
    assert_eq!(c.cap(&ctx), Err(Error::Unimplemented));

    assert_eq!(c.get(&ctx, 1), Err(Error::Get));
    assert_eq!(shared.borrow().len(&ctx)?, 0);

    Ok(())
}

// Any `Container` works behind a generic bound
#[test]
fn generic_callers_accept_both() -> Result<()> {
    fn fill<C: Container<i32, i32>>(c: &mut C, n: i32) -> Result<usize> {
        let ctx = Context::background();
        for i in 0..n {
            c.put(&ctx, i, i * i)?;
        }
        c.len(&ctx)
    }

    let shared = Rc::new(RefCell::new(MapContainer::new()));
    assert_eq!(fill(&mut adapter_over(&shared), 4)?, 4);
    assert_eq!(fill(&mut MapContainer::<i32, i32>::new(), 4)?, 4);
    assert!(fill(&mut ContainerFn::<i32, i32>::new(), 4).unwrap_err().is_unimplemented());

    Ok(())
}

#[test]
fn putter_fn_keeps_state_between_calls() -> Result<()> {
    let ctx = Context::background();
    let mut count = 0;
    let mut p = PutterFn::new(move |_: &Context, _key: i32, _val: i32| {
        count += 1;
        if count > 2 {
            Err(Error::Put)
        } else {
            Ok(())
        }
    });

    p.put(&ctx, 1, 1)?;
    p.put(&ctx, 2, 2)?;
    assert_eq!(p.put(&ctx, 3, 3), Err(Error::Put));

    Ok(())
}
