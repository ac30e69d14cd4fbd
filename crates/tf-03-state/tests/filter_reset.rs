use proptest::prelude::*;
use shared_types::{Project, ProjectSortField, ProjectStatus, SortDirection};
use tf_03_state::{
    domain::project_list::reduce, DateRange, FilterValue, ProjectListCommand,
    ProjectListFiltersPatch, ProjectListState, ProjectPage, ProjectSort,
};

fn project(id: &str) -> Project {
    let mut p = Project::new(format!("Project {id}"), "owner-1");
    p.id = id.to_string();
    p
}

fn arb_status() -> impl Strategy<Value = FilterValue<ProjectStatus>> {
    prop_oneof![
        Just(FilterValue::All),
        Just(FilterValue::Only(ProjectStatus::Active)),
        Just(FilterValue::Only(ProjectStatus::Archived)),
        Just(FilterValue::Only(ProjectStatus::Completed)),
        Just(FilterValue::Only(ProjectStatus::OnHold)),
    ]
}

fn arb_sort() -> impl Strategy<Value = ProjectSort> {
    (
        prop_oneof![
            Just(ProjectSortField::Name),
            Just(ProjectSortField::CreatedAt),
            Just(ProjectSortField::UpdatedAt),
        ],
        prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)],
    )
        .prop_map(|(field, direction)| ProjectSort::new(field, direction))
}

fn arb_result_set_command() -> impl Strategy<Value = ProjectListCommand> {
    prop_oneof![
        "[a-z]{0,8}".prop_map(ProjectListCommand::UpdateSearchTerm),
        arb_status().prop_map(ProjectListCommand::UpdateStatusFilter),
        arb_sort().prop_map(ProjectListCommand::UpdateSort),
        Just(ProjectListCommand::ResetFilters),
        Just(ProjectListCommand::ResetSort),
        Just(ProjectListCommand::UpdateDateRange(DateRange::default())),
        (proptest::option::of("[a-z]{0,4}"), proptest::option::of(arb_status())).prop_map(
            |(search_term, status)| {
                ProjectListCommand::UpdateFilters(ProjectListFiltersPatch {
                    search_term,
                    status,
                    ..Default::default()
                })
            }
        ),
    ]
}

/// Loaded list on `page`, with every id in `selected` selected.
fn populated(page: u32, selected: &[usize]) -> ProjectListState {
    let ids = ["a", "b", "c", "d", "e"];
    let mut state = reduce(
        ProjectListState::default(),
        &ProjectListCommand::LoadSuccess {
            page: ProjectPage {
                projects: ids.iter().map(|id| project(id)).collect(),
                page: 1,
                total: 40,
                has_more: true,
            },
            append: false,
        },
    );
    for index in selected {
        state = reduce(state, &ProjectListCommand::Select(ids[index % ids.len()].into()));
    }
    state.pagination.page = page;
    state
}

proptest! {
    #[test]
    fn result_set_change_resets_page_and_selection(
        page in 1u32..20,
        selected in prop::collection::vec(0usize..5, 0..5),
        command in arb_result_set_command(),
    ) {
        prop_assert!(command.changes_result_set());
        let state = reduce(populated(page, &selected), &command);
        prop_assert_eq!(state.pagination.page, 1);
        prop_assert!(state.selected_ids.is_empty());
        prop_assert_eq!(state.entities.len(), 5);
    }

    #[test]
    fn selection_stays_within_loaded_ids(
        selected in prop::collection::vec(0usize..5, 0..8),
        extra in "[a-z]{1,3}",
    ) {
        let state = populated(1, &selected);
        let state = reduce(state, &ProjectListCommand::Select(extra));
        for id in &state.selected_ids {
            prop_assert!(state.entities.contains(id));
        }
        let mut deduped = state.selected_ids.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), state.selected_ids.len());
    }
}
