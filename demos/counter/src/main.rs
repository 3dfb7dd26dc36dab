use std::cell::RefCell;
use std::rc::Rc;

use recall_core::prelude::*;
use recall_devtools::PassMonitor;

#[derive(Clone, Default)]
struct Controls {
    set_count: Option<Updater<i32>>,
    set_label: Option<Updater<String>>,
}

fn app(hooks: &Hooks<'_>, controls: &RefCell<Controls>) -> Result<(), BoxError> {
    let (count, set_count) = hooks.use_state(0i32);
    let (label, set_label) = hooks.use_state_with(|| String::from("Count"));

    println!("[pass {}] {label}: {count}", hooks.pass());

    let mut c = controls.borrow_mut();
    c.set_count = Some(set_count);
    c.set_label = Some(set_label);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let controls = Rc::new(RefCell::new(Controls::default()));
    let root = Root::new().with_render({
        let controls = controls.clone();
        move |hooks| app(hooks, &controls)
    });
    let monitor = PassMonitor::attach(&root);

    root.render()?;

    let Controls {
        set_count,
        set_label,
    } = controls.borrow().clone();
    let (Some(set_count), Some(set_label)) = (set_count, set_label) else {
        anyhow::bail!("first pass did not register its updaters");
    };

    // "Increment" twice, "Decrement" once, then jump straight to 5.
    set_count.set_with(|c| c + 1)?;
    set_count.set_with(|c| c + 1)?;
    set_count.set_with(|c| c - 1)?;
    set_count.set(5)?;
    set_label.set_with(|l| format!("{l} (edited)"))?;
    // Same value again still renders.
    set_count.set(5)?;

    for slot in root.inspect() {
        log::info!("{:?}: {}", slot.addr, slot.type_name);
    }
    println!("{}", monitor.summary());
    Ok(())
}
