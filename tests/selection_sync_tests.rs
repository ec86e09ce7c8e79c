use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chart_sync::api::{SyncArgument, SynchronizationHandle, synchronize};
use chart_sync::chart::{
    ChartRef, HighlightEvent, HighlightHook, MemoryChart, OptionsPatch, Selection, SyncChart,
    UnhighlightEvent, UnhighlightHook,
};
use chart_sync::core::{Range, SyncOptions};

fn rendered_chart(label: &str, x_values: Vec<f64>) -> Rc<MemoryChart> {
    let chart = Rc::new(MemoryChart::new(label, x_values));
    chart.render().expect("initial render");
    chart
}

fn recording_highlight_hook(sink: &Rc<RefCell<Vec<HighlightEvent>>>) -> HighlightHook {
    let sink = Rc::clone(sink);
    Rc::new(move |event: &HighlightEvent| {
        sink.borrow_mut().push(event.clone());
        Ok(())
    })
}

fn counting_unhighlight_hook(counter: &Rc<Cell<usize>>) -> UnhighlightHook {
    let counter = Rc::clone(counter);
    Rc::new(move |_event: &UnhighlightEvent| {
        counter.set(counter.get() + 1);
        Ok(())
    })
}

fn sync(charts: &[Rc<MemoryChart>], options: SyncOptions) -> SynchronizationHandle {
    let mut args: Vec<SyncArgument> = charts
        .iter()
        .map(|chart| SyncArgument::Chart(chart.clone()))
        .collect();
    args.push(options.into());
    synchronize(args).expect("synchronize")
}

fn selected(row: usize, series: &str) -> Option<Selection> {
    Some(Selection {
        row,
        series_name: Some(series.to_owned()),
    })
}

#[test]
fn highlight_selects_row_with_same_x_on_other_charts() {
    let g1 = rendered_chart("g1", (0_u32..10).map(|i| f64::from(i) * 4.0).collect());
    let g2 = rendered_chart("g2", vec![0.0, 10.0, 20.0, 30.0]);
    let g1_events = Rc::new(RefCell::new(Vec::new()));
    let g2_events = Rc::new(RefCell::new(Vec::new()));
    for (chart, sink) in [(&g1, &g1_events), (&g2, &g2_events)] {
        chart
            .update_options(
                OptionsPatch::default().with_highlight_hook(Some(recording_highlight_hook(sink))),
                true,
            )
            .expect("install highlight hook");
    }
    let _handle = sync(
        &[g1.clone(), g2.clone()],
        SyncOptions::default().with_zoom(false),
    );

    g1.highlight_row(5, Some("temp")).expect("hover g1");

    assert_eq!(g2.selection(), selected(2, "temp"));
    assert!(g2_events.borrow().is_empty(), "g2 original hook not invoked");
    let g1_events = g1_events.borrow();
    assert_eq!(g1_events.len(), 1);
    assert_eq!(g1_events[0].x, 20.0);
    assert_eq!(g1_events[0].row, 5);
    assert_eq!(g1_events[0].series_name.as_deref(), Some("temp"));
}

#[test]
fn chart_without_matching_x_keeps_its_selection() {
    let g1 = rendered_chart("g1", vec![0.0, 10.0, 20.0]);
    let g2 = rendered_chart("g2", vec![0.0, 10.0, 20.0]);
    let g3 = rendered_chart("g3", vec![1.0, 3.0, 5.0]);
    g3.set_selection(1, Some("rain")).expect("preselect g3");
    let _handle = sync(&[g1.clone(), g2.clone(), g3.clone()], SyncOptions::default());

    g1.highlight_row(2, Some("temp")).expect("hover g1");

    assert_eq!(g2.selection(), selected(2, "temp"));
    assert_eq!(g3.selection(), selected(1, "rain"));
}

#[test]
fn highlight_without_series_name_is_mirrored_as_is() {
    let g1 = rendered_chart("g1", vec![0.0, 10.0, 20.0]);
    let g2 = rendered_chart("g2", vec![10.0, 20.0]);
    let _handle = sync(&[g1.clone(), g2.clone()], SyncOptions::default());

    g1.highlight_row(1, None).expect("hover g1");

    assert_eq!(
        g2.selection(),
        Some(Selection {
            row: 0,
            series_name: None
        })
    );
}

#[test]
fn unhighlight_clears_every_other_chart() {
    let g1 = rendered_chart("g1", vec![0.0, 10.0, 20.0]);
    let g2 = rendered_chart("g2", vec![0.0, 10.0, 20.0]);
    let g3 = rendered_chart("g3", vec![0.0, 10.0, 20.0]);
    let counters: Vec<Rc<Cell<usize>>> = (0..3).map(|_| Rc::new(Cell::new(0))).collect();
    for (chart, counter) in [&g1, &g2, &g3].into_iter().zip(&counters) {
        chart
            .update_options(
                OptionsPatch::default()
                    .with_unhighlight_hook(Some(counting_unhighlight_hook(counter))),
                true,
            )
            .expect("install unhighlight hook");
    }
    let _handle = sync(&[g1.clone(), g2.clone(), g3.clone()], SyncOptions::default());

    g2.highlight_row(1, Some("temp")).expect("hover g2");
    assert_eq!(g1.selection(), selected(1, "temp"));
    assert_eq!(g3.selection(), selected(1, "temp"));

    g2.unhighlight().expect("leave g2");

    assert_eq!(g1.selection(), None);
    assert_eq!(g2.selection(), None);
    assert_eq!(g3.selection(), None);
    let calls: Vec<usize> = counters.iter().map(|counter| counter.get()).collect();
    assert_eq!(calls, vec![0, 1, 0], "only the origin's original hook runs");
}

#[test]
fn selection_disabled_leaves_other_charts_alone() {
    let g1 = rendered_chart("g1", vec![0.0, 10.0, 20.0]);
    let g2 = rendered_chart("g2", vec![0.0, 10.0, 20.0]);
    let _handle = sync(
        &[g1.clone(), g2.clone()],
        SyncOptions::default().with_selection(false),
    );

    g1.highlight_row(1, Some("temp")).expect("hover g1");
    assert_eq!(g2.selection(), None);
    assert!(g1.highlight_hook().is_none());

    g1.set_viewport(Range::new(0.0, 10.0), None)
        .expect("pan g1");
    assert_eq!(g2.date_window(), Some(Range::new(0.0, 10.0)));
}

#[test]
fn programmatic_selection_on_member_is_mirrored() {
    let g1 = rendered_chart("g1", vec![0.0, 10.0, 20.0]);
    let g2 = rendered_chart("g2", vec![20.0, 10.0, 0.0]);
    let g1_ref: ChartRef = g1.clone();
    let _handle = sync(&[g1.clone(), g2.clone()], SyncOptions::default());

    g1_ref.set_selection(0, Some("temp")).expect("select on g1");

    assert_eq!(g2.selection(), selected(2, "temp"));
}
