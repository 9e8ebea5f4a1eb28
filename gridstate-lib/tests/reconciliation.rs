//! Integration tests for slice ownership, dispatch and config precedence.

use std::sync::{Arc, Mutex};

use gridstate_lib::prelude::*;

/// Records every value a change callback receives.
fn recorder<T: Send + 'static>() -> (OnChange<T>, Arc<Mutex<Vec<T>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let on_change = OnChange::new({
        let seen = Arc::clone(&seen);
        move |v| seen.lock().unwrap().push(v)
    });
    (on_change, seen)
}

// =============================================================================
// Config precedence
// =============================================================================

mod precedence {
    use super::*;

    #[test]
    fn test_legacy_precedence() {
        let mut options = GridOptions::default();
        options.options.features.sorting = Field::Value(false);
        options.legacy.flags.enable_sorting = Some(true);
        let grid = Grid::new(&options);
        assert!(grid.bind(&options).config.is_enabled(Feature::Sorting));
    }

    #[test]
    fn test_grouped_precedence_over_default() {
        assert!(!Defaults::builtin().feature(Feature::RowSelection));
        let mut options = GridOptions::default();
        options.options.features.row_selection = Field::Value(true);
        let config = options.resolve(&Defaults::builtin());
        assert!(config.is_enabled(Feature::RowSelection));
    }

    #[test]
    fn test_legacy_disables_default_pagination() {
        let defaults = Defaults::builtin().with_feature(Feature::Pagination, true);
        let mut options = GridOptions::default();
        options.legacy.flags.enable_pagination = Some(false);
        let config = gridstate_lib::resolve(&options.options, &options.legacy, &defaults);
        assert!(!config.is_enabled(Feature::Pagination));
    }

    #[test]
    fn test_config_rebuilt_every_pass() {
        let mut options = GridOptions::default();
        let grid = Grid::new(&options);
        assert!(!grid.bind(&options).config.is_enabled(Feature::Grouping));
        options.legacy.flags.enable_grouping = Some(true);
        assert!(grid.bind(&options).config.is_enabled(Feature::Grouping));
        options.legacy.flags.enable_grouping = None;
        assert!(!grid.bind(&options).config.is_enabled(Feature::Grouping));
    }
}

// =============================================================================
// Uncontrolled slices
// =============================================================================

mod uncontrolled {
    use super::*;

    #[test]
    fn test_echo_literal() {
        let options = GridOptions::default();
        let grid = Grid::new(&options);
        grid.bind(&options)
            .global_filter
            .dispatch
            .set("acme".to_string())
            .unwrap();
        assert_eq!(grid.bind(&options).global_filter.value, "acme");
    }

    #[test]
    fn test_echo_function() {
        let mut options = GridOptions::default();
        options.options.initial_state.pagination = Field::Value(PaginationState {
            page_index: 5,
            page_size: 10,
        });
        let grid = Grid::new(&options);
        grid.bind(&options)
            .pagination
            .dispatch
            .update(|p| PaginationState {
                page_index: p.page_index + 1,
                ..*p
            })
            .unwrap();
        assert_eq!(grid.bind(&options).pagination.value.page_index, 6);
    }

    #[test]
    fn test_row_selection_helpers_as_updaters() {
        let mut options = GridOptions::default();
        options.options.features.row_selection = Field::Value(true);
        options.legacy.display.row_selection_mode = Some(SelectionMode::Single);
        let grid = Grid::new(&options);

        let mode = grid.bind(&options).config.selection_mode();
        assert_eq!(mode, SelectionMode::Single);
        grid.bind(&options)
            .row_selection
            .dispatch
            .update(move |sel| sel.toggled("r1", mode))
            .unwrap();
        grid.bind(&options)
            .row_selection
            .dispatch
            .update(move |sel| sel.toggled("r2", mode))
            .unwrap();
        assert_eq!(grid.bind(&options).row_selection.value.selected(), vec!["r2"]);
    }

    #[test]
    fn test_sorting_scenario() {
        let options = GridOptions::default();
        let grid = Grid::new(&options);
        assert!(grid.bind(&options).sorting.value.is_empty());
        grid.bind(&options)
            .sorting
            .dispatch
            .update(|_| vec![ColumnSort::asc("name")])
            .unwrap();
        assert_eq!(
            grid.bind(&options).sorting.value,
            vec![ColumnSort {
                id: "name".into(),
                desc: false
            }]
        );
    }

    #[test]
    fn test_function_updates_compose_within_a_pass() {
        let options = GridOptions::default();
        let grid = Grid::new(&options);
        let bindings = grid.bind(&options);
        bindings
            .grouping
            .dispatch
            .update(|g| toggle_grouping(g, "team"))
            .unwrap();
        bindings
            .grouping
            .dispatch
            .update(|g| toggle_grouping(g, "region"))
            .unwrap();
        assert_eq!(grid.bind(&options).grouping.value, vec!["team", "region"]);
    }

    #[test]
    fn test_updater_failure_leaves_value() {
        let options = GridOptions::default();
        let grid = Grid::new(&options);
        grid.store().set::<GlobalFilter>("before".to_string());
        let revision = grid.store().revision();

        let err = grid
            .bind(&options)
            .global_filter
            .dispatch
            .call(Updater::try_with(|_| Err("rejected".into())))
            .unwrap_err();

        assert_eq!(err.slice(), SliceName::GlobalFilter);
        assert_eq!(err.updater_error(), Some(&UpdaterError::new("rejected")));
        assert_eq!(grid.bind(&options).global_filter.value, "before");
        assert_eq!(grid.store().revision(), revision);
    }
}

// =============================================================================
// Controlled slices
// =============================================================================

mod controlled {
    use super::*;

    #[test]
    fn test_callback_receives_value_once() {
        let (on_change, seen) = recorder();
        let mut options = GridOptions::default();
        options.legacy.slices.on_sorting_change = Some(on_change);
        let grid = Grid::new(&options);

        let bindings = grid.bind(&options);
        assert!(bindings.sorting.is_controlled());
        bindings
            .sorting
            .dispatch
            .set(vec![ColumnSort::desc("age")])
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![vec![ColumnSort::desc("age")]]);
        // Not re-supplied by the caller, so the read value is unchanged.
        assert!(grid.bind(&options).sorting.value.is_empty());
    }

    #[test]
    fn test_supplied_value_overrides_legacy_prop() {
        let notified: Arc<Mutex<Vec<SliceValue>>> = Arc::new(Mutex::new(Vec::new()));
        let mut options = GridOptions::from_json(r#"{"globalFilter": "caller-legacy"}"#).unwrap();
        options.options.callbacks.set_tagged(
            SliceName::GlobalFilter,
            OnChange::new({
                let notified = Arc::clone(&notified);
                move |v| notified.lock().unwrap().push(v)
            }),
        );
        let grid = Grid::new(&options);
        assert_eq!(grid.bind(&options).global_filter.value, "caller-legacy");

        grid.bind(&options)
            .dispatch_value(SliceValue::GlobalFilter("acme".into()))
            .unwrap();
        let pending: Vec<_> = notified.lock().unwrap().drain(..).collect();
        for value in pending {
            options.supply(value);
        }

        let bindings = grid.bind(&options);
        assert!(bindings.global_filter.is_controlled());
        assert_eq!(bindings.global_filter.value, "acme");
        assert_eq!(grid.store().revision(), 0);
    }

    #[test]
    fn test_never_writes_store() {
        let (on_change, seen) = recorder();
        let mut options = GridOptions::default();
        options.options.callbacks.pagination = Field::Value(on_change);
        let grid = Grid::new(&options);

        for _ in 0..5 {
            grid.bind(&options)
                .pagination
                .dispatch
                .update(|p| p.next_page(1000))
                .unwrap();
        }

        assert_eq!(seen.lock().unwrap().len(), 5);
        assert_eq!(grid.store().revision(), 0);
        assert_eq!(grid.store().get::<Pagination>(), PaginationState::default());
    }

    #[test]
    fn test_updater_sees_caller_value() {
        let (on_change, seen) = recorder();
        let mut options = GridOptions::default();
        options.options.callbacks.global_filter = Field::Value(on_change);
        options.options.state.global_filter = Field::Value("abc".to_string());
        let grid = Grid::new(&options);

        let bindings = grid.bind(&options);
        assert_eq!(bindings.global_filter.value, "abc");
        bindings
            .global_filter
            .dispatch
            .update(|prev| format!("{prev}d"))
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["abcd".to_string()]);
    }

    #[test]
    fn test_caller_feeds_value_back() {
        let (on_change, seen) = recorder();
        let mut options = GridOptions::default();
        options.legacy.slices.on_grouping_change = Some(on_change);
        let grid = Grid::new(&options);

        grid.bind(&options)
            .grouping
            .dispatch
            .set(vec!["team".into()])
            .unwrap();
        let next = seen.lock().unwrap().pop().unwrap();
        options.legacy.slices.grouping = Some(next);

        assert_eq!(grid.bind(&options).grouping.value, vec!["team"]);
    }

    #[test]
    fn test_failed_updater_skips_callback() {
        let (on_change, seen) = recorder::<GlobalFilterState>();
        let mut options = GridOptions::default();
        options.legacy.slices.on_global_filter_change = Some(on_change);
        let grid = Grid::new(&options);

        let result = grid
            .bind(&options)
            .global_filter
            .dispatch
            .call(Updater::try_with(|_| Err("nope".into())));
        assert!(result.is_err());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_other_slices_stay_uncontrolled() {
        let (on_change, _seen) = recorder();
        let mut options = GridOptions::default();
        options.legacy.slices.on_row_selection_change = Some(on_change);
        let grid = Grid::new(&options);
        let bindings = grid.bind(&options);
        for name in SliceName::ALL {
            assert_eq!(bindings.is_controlled(*name), *name == SliceName::RowSelection);
        }
    }
}

// =============================================================================
// Ownership flips between passes
// =============================================================================

mod ownership_flip {
    use super::*;

    #[test]
    fn test_flip_does_not_migrate_value() {
        let mut options = GridOptions::default();
        let grid = Grid::new(&options);
        grid.bind(&options)
            .global_filter
            .dispatch
            .set("internal".to_string())
            .unwrap();

        let (on_change, _seen) = recorder();
        options.legacy.slices.on_global_filter_change = Some(on_change);
        options.legacy.slices.global_filter = Some("caller".to_string());
        let bindings = grid.bind(&options);
        assert!(bindings.global_filter.is_controlled());
        assert_eq!(bindings.global_filter.value, "caller");

        options.legacy.slices.on_global_filter_change = None;
        let bindings = grid.bind(&options);
        assert!(!bindings.global_filter.is_controlled());
        assert_eq!(bindings.global_filter.value, "internal");
    }
}

// =============================================================================
// Engine and exporter collaborators
// =============================================================================

mod collaborators {
    use super::*;

    /// Fake engine that records what it was synced with and answers header
    /// clicks with sorting dispatches.
    #[derive(Default)]
    struct HeaderClickEngine {
        synced: Vec<SortingState>,
    }

    impl HeaderClickEngine {
        fn click_header(&self, bindings: &GridBindings, id: &str, shift: bool) {
            if !bindings.config.is_enabled(Feature::Sorting) {
                return;
            }
            let toggle = bindings.config.sort_toggle(shift);
            let id = id.to_string();
            bindings
                .sorting
                .dispatch
                .update(move |prev| toggle_sort(prev, &id, toggle))
                .unwrap();
        }
    }

    impl GridEngine for HeaderClickEngine {
        fn sync(&mut self, _config: &CanonicalConfig, bindings: &GridBindings) {
            self.synced.push(bindings.sorting.value.clone());
        }
    }

    struct PipeExporter;

    impl Exporter for PipeExporter {
        type Row = Vec<(String, String)>;

        fn export(
            &self,
            rows: &[Self::Row],
            columns: &[ColumnDescriptor],
        ) -> Result<String, gridstate_lib::engine::ExportError> {
            let header: Vec<_> = columns.iter().map(|c| c.header.as_str()).collect();
            let mut out = header.join("|");
            for row in rows {
                let cells: Vec<_> = columns
                    .iter()
                    .map(|c| {
                        row.iter()
                            .find(|(id, _)| *id == c.id)
                            .map(|(_, v)| v.as_str())
                            .unwrap_or("")
                    })
                    .collect();
                out.push('\n');
                out.push_str(&cells.join("|"));
            }
            Ok(out)
        }
    }

    #[test]
    fn test_engine_header_clicks() {
        let mut options = GridOptions::default();
        options.legacy.flags.enable_multi_sort = Some(true);
        let grid = Grid::new(&options);
        let mut engine = HeaderClickEngine::default();

        let bindings = grid.bind(&options);
        engine.sync(&bindings.config, &bindings);
        engine.click_header(&bindings, "name", false);

        let bindings = grid.bind(&options);
        engine.sync(&bindings.config, &bindings);
        engine.click_header(&bindings, "age", true);

        let bindings = grid.bind(&options);
        engine.sync(&bindings.config, &bindings);

        assert_eq!(
            engine.synced,
            vec![
                vec![],
                vec![ColumnSort::asc("name")],
                vec![ColumnSort::asc("name"), ColumnSort::asc("age")],
            ]
        );
    }

    #[test]
    fn test_engine_respects_disabled_sorting() {
        let mut options = GridOptions::default();
        options.legacy.flags.enable_sorting = Some(false);
        let grid = Grid::new(&options);
        HeaderClickEngine::default().click_header(&grid.bind(&options), "name", false);
        assert!(grid.bind(&options).sorting.value.is_empty());
    }

    #[test]
    fn test_export_uses_visible_columns() {
        let mut options = GridOptions::default();
        options.legacy.slices.default_column_visibility =
            Some(VisibilityState::from([("email".to_string(), false)]));
        options.legacy.slices.default_column_order = Some(vec!["name".into()]);
        let grid = Grid::new(&options);

        let columns = vec![
            ColumnDescriptor::new("id", "ID"),
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("email", "Email"),
        ];
        let rows = vec![vec![
            ("id".to_string(), "1".to_string()),
            ("name".to_string(), "Ada".to_string()),
            ("email".to_string(), "ada@example.com".to_string()),
        ]];

        let visible = export_columns(&columns, &grid.bind(&options));
        let out = PipeExporter.export(&rows, &visible).unwrap();
        assert_eq!(out, "Name|ID\nAda|1");
    }
}
